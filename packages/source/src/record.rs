//! Conversion of raw feed rows into [`Permit`] entities.
//!
//! The feed is JSON with every field a string and any field possibly
//! absent. A missing required field fails the record with an error naming
//! the field and the permit id; an unparsable parking-held fragment only
//! degrades that block to `None`.

use chrono::NaiveDateTime;
use serde::Deserialize;

use permit_map_normalize::parse_parking_held;
use permit_map_permit_models::Permit;

/// Wire format for the feed's datetime fields, after the `T` separator is
/// replaced and any fractional-second suffix is truncated.
const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One raw row from the film-permit feed.
///
/// All fields are optional at the wire level; requiredness is enforced by
/// [`build_permit`], not by deserialization, so one malformed row cannot
/// fail a whole download.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPermitRecord {
    #[serde(default)]
    pub eventid: Option<String>,
    #[serde(default)]
    pub parkingheld: Option<String>,
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub zipcode_s: Option<String>,
    #[serde(default)]
    pub startdatetime: Option<String>,
    #[serde(default)]
    pub enddatetime: Option<String>,
    #[serde(default)]
    pub enteredon: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategoryname: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Error building a [`Permit`] from a raw row.
///
/// Always identifies the offending field and the permit id (or
/// `"<unknown>"` when the id itself is missing), so a batch caller can
/// log-and-skip with attribution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// A required field was absent from the row.
    #[error("permit {permit_id}: missing required field `{field}`")]
    MissingField {
        /// Permit id, or `"<unknown>"` if `eventid` itself was missing.
        permit_id: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A datetime field did not match the wire format.
    #[error("permit {permit_id}: invalid datetime in `{field}`: {value:?}")]
    InvalidDatetime {
        /// Permit id.
        permit_id: String,
        /// Name of the offending field.
        field: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Builds a [`Permit`] from one raw feed row.
///
/// # Errors
///
/// Returns [`BuildError`] if a required field is missing or a datetime
/// field is unparsable. Unparsable parking-held fragments do not fail the
/// record; they become `None` entries in `blocks`.
pub fn build_permit(raw: &RawPermitRecord) -> Result<Permit, BuildError> {
    let id = raw
        .eventid
        .clone()
        .ok_or_else(|| missing("<unknown>", "eventid"))?;

    let parking_held = required(&id, "parkingheld", raw.parkingheld.as_ref())?;
    let borough = required(&id, "borough", raw.borough.as_ref())?;
    let zipcode_s = required(&id, "zipcode_s", raw.zipcode_s.as_ref())?;
    let category = required(&id, "category", raw.category.as_ref())?;
    let subcategory = required(&id, "subcategoryname", raw.subcategoryname.as_ref())?;
    let origin = required(&id, "country", raw.country.as_ref())?;

    let start_datetime = datetime(&id, "startdatetime", raw.startdatetime.as_ref())?;
    let end_datetime = datetime(&id, "enddatetime", raw.enddatetime.as_ref())?;
    let entered_on = datetime(&id, "enteredon", raw.enteredon.as_ref())?;

    let blocks = parse_parking_held(&parking_held);

    Ok(Permit {
        id,
        start_datetime,
        end_datetime,
        entered_on,
        category,
        subcategory,
        origin,
        borough,
        zip_codes: split_zip_codes(&zipcode_s),
        blocks,
    })
}

/// Parses a feed datetime of the form `YYYY-MM-DDTHH:MM:SS[.fff]`: the
/// literal `T` separator becomes a space and any fractional-second suffix
/// is truncated before parsing.
#[must_use]
pub fn parse_wire_datetime(value: &str) -> Option<NaiveDateTime> {
    let spaced = value.replace('T', " ");
    let truncated = spaced.split('.').next().unwrap_or(&spaced);
    NaiveDateTime::parse_from_str(truncated, WIRE_DATETIME_FORMAT).ok()
}

/// Splits the comma-space-joined zip-code field, keeping the feed's
/// missing-value sentinels (`"0"`, `"N/A"`) for downstream filtering.
fn split_zip_codes(zipcode_s: &str) -> Vec<String> {
    if zipcode_s.trim().is_empty() {
        return Vec::new();
    }
    zipcode_s.split(", ").map(str::to_string).collect()
}

fn required(
    permit_id: &str,
    field: &'static str,
    value: Option<&String>,
) -> Result<String, BuildError> {
    value.cloned().ok_or_else(|| missing(permit_id, field))
}

fn datetime(
    permit_id: &str,
    field: &'static str,
    value: Option<&String>,
) -> Result<NaiveDateTime, BuildError> {
    let raw = required(permit_id, field, value)?;
    parse_wire_datetime(&raw).ok_or_else(|| BuildError::InvalidDatetime {
        permit_id: permit_id.to_string(),
        field,
        value: raw,
    })
}

fn missing(permit_id: &str, field: &'static str) -> BuildError {
    BuildError::MissingField {
        permit_id: permit_id.to_string(),
        field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike as _};

    fn raw_row() -> RawPermitRecord {
        RawPermitRecord {
            eventid: Some("446040".to_string()),
            parkingheld: Some("W 48 St between 6 Ave and 7 Ave, Dead End between A and B".to_string()),
            borough: Some("Manhattan".to_string()),
            zipcode_s: Some("10036, 10019".to_string()),
            startdatetime: Some("2020-05-01T09:00:00.000".to_string()),
            enddatetime: Some("2020-05-01T23:00:00.000".to_string()),
            enteredon: Some("2020-04-20T12:30:15.000".to_string()),
            category: Some("Television".to_string()),
            subcategoryname: Some("Episodic series".to_string()),
            country: Some("United States of America".to_string()),
        }
    }

    #[test]
    fn builds_full_permit() {
        let permit = build_permit(&raw_row()).unwrap();
        assert_eq!(permit.id, "446040");
        assert_eq!(permit.borough, "Manhattan");
        assert_eq!(permit.zip_codes, vec!["10036", "10019"]);
        assert_eq!(permit.category, "Television");
        assert_eq!(permit.subcategory, "Episodic series");
        assert_eq!(permit.origin, "United States of America");
        assert_eq!(permit.blocks.len(), 2);
        assert!(permit.blocks[0].is_some());
        assert!(permit.blocks[1].is_none());
    }

    #[test]
    fn parses_wire_datetime() {
        let parsed = parse_wire_datetime("2020-05-01T09:00:00.000").unwrap();
        assert_eq!(
            parsed.date(),
            NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
        );
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.minute(), 0);
        assert_eq!(parsed.second(), 0);
    }

    #[test]
    fn parses_wire_datetime_without_fraction() {
        assert!(parse_wire_datetime("2020-05-01T09:00:00").is_some());
    }

    #[test]
    fn rejects_malformed_datetime() {
        assert!(parse_wire_datetime("05/01/2020 9am").is_none());
        assert!(parse_wire_datetime("").is_none());
    }

    #[test]
    fn missing_required_field_names_field_and_permit() {
        let mut raw = raw_row();
        raw.borough = None;
        let err = build_permit(&raw).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingField {
                permit_id: "446040".to_string(),
                field: "borough",
            }
        );
    }

    #[test]
    fn missing_eventid_reports_unknown_permit() {
        let mut raw = raw_row();
        raw.eventid = None;
        let err = build_permit(&raw).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingField {
                permit_id: "<unknown>".to_string(),
                field: "eventid",
            }
        );
    }

    #[test]
    fn invalid_datetime_is_fatal_for_record() {
        let mut raw = raw_row();
        raw.enteredon = Some("not a date".to_string());
        let err = build_permit(&raw).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidDatetime {
                field: "enteredon",
                ..
            }
        ));
    }

    #[test]
    fn sentinel_zip_codes_are_preserved() {
        let mut raw = raw_row();
        raw.zipcode_s = Some("0, N/A, 11101".to_string());
        let permit = build_permit(&raw).unwrap();
        assert_eq!(permit.zip_codes, vec!["0", "N/A", "11101"]);
    }

    #[test]
    fn empty_zip_field_yields_no_zip_codes() {
        let mut raw = raw_row();
        raw.zipcode_s = Some(String::new());
        let permit = build_permit(&raw).unwrap();
        assert!(permit.zip_codes.is_empty());
    }

    #[test]
    fn unparsable_block_degrades_not_fails() {
        let mut raw = raw_row();
        raw.parkingheld = Some("Broadway".to_string());
        let permit = build_permit(&raw).unwrap();
        assert_eq!(permit.blocks, vec![None]);
    }
}
