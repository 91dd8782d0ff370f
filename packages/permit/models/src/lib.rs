#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Film permit entity types.
//!
//! This crate defines the canonical [`Permit`] entity that every raw
//! film-permit row is normalized into, the [`BlockDescriptor`] street
//! triplet produced by address parsing, and the [`Borough`] enum with its
//! county-name crosswalk used for scoping street geometry lookups.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Zip-code values the upstream feed uses to mean "no zip code".
///
/// These sentinels are preserved on the [`Permit`] itself and only
/// filtered out by consumers that aggregate at ZIP level.
pub const ZIP_SENTINELS: &[&str] = &["0", "N/A"];

/// Returns `true` if the zip-code string is one of the upstream feed's
/// missing-value sentinels.
#[must_use]
pub fn is_zip_sentinel(zip: &str) -> bool {
    ZIP_SENTINELS.contains(&zip)
}

/// One of the five New York City boroughs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[strum(serialize = "Staten Island")]
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    /// Returns the county name used by state-level datasets for this
    /// borough (e.g. street centerline exports keyed by county).
    #[must_use]
    pub const fn county_name(self) -> &'static str {
        match self {
            Self::Manhattan => "New York",
            Self::Brooklyn => "Kings",
            Self::Queens => "Queens",
            Self::Bronx => "Bronx",
            Self::StatenIsland => "Richmond",
        }
    }

    /// Resolves a county name back to its borough.
    #[must_use]
    pub fn from_county_name(county: &str) -> Option<Self> {
        match county {
            "New York" => Some(Self::Manhattan),
            "Kings" => Some(Self::Brooklyn),
            "Queens" => Some(Self::Queens),
            "Bronx" => Some(Self::Bronx),
            "Richmond" => Some(Self::StatenIsland),
            _ => None,
        }
    }

    /// Leniently parses a borough from a raw feed string.
    ///
    /// The feed is inconsistent about casing ("MANHATTAN", "Manhattan",
    /// "manhattan"); anything unrecognized yields `None` rather than an
    /// error, since permits with unknown boroughs are still usable for
    /// everything except geometry scoping.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Manhattan,
            Self::Brooklyn,
            Self::Queens,
            Self::Bronx,
            Self::StatenIsland,
        ]
    }
}

/// A parsed street-closure block: the main street being held plus the two
/// cross streets bounding the closed segment.
///
/// All three names are canonical street names (see `permit_map_normalize`),
/// used as join keys into the street geometry index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    /// The street the parking is held on.
    pub main: String,
    /// First bounding cross street.
    pub cross_1: String,
    /// Second bounding cross street.
    pub cross_2: String,
}

/// A film permit normalized from one raw feed row.
///
/// Constructed once by the record builder and immutable afterwards;
/// downstream stages materialize derived rows (one per block, one per zip
/// code) but never mutate the entity itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    /// Event id from the feed, unique per permit.
    pub id: String,
    /// When the shoot starts.
    pub start_datetime: NaiveDateTime,
    /// When the shoot ends.
    pub end_datetime: NaiveDateTime,
    /// When the permit was entered into the system.
    pub entered_on: NaiveDateTime,
    /// Top-level production category (e.g. "Film", "Television").
    pub category: String,
    /// Production subcategory (e.g. "Episodic series").
    pub subcategory: String,
    /// Country of origin for the production.
    pub origin: String,
    /// Borough string exactly as the feed supplied it.
    pub borough: String,
    /// Zip codes covered by the permit, in feed order. May contain the
    /// sentinels `"0"` or `"N/A"` (see [`is_zip_sentinel`]).
    pub zip_codes: Vec<String>,
    /// Parsed street-closure blocks, in feed order. Fragments that could
    /// not be parsed are retained as `None`.
    pub blocks: Vec<Option<BlockDescriptor>>,
}

impl Permit {
    /// The borough as an enum, when the feed string is one of the five
    /// boroughs.
    #[must_use]
    pub fn borough_enum(&self) -> Option<Borough> {
        Borough::parse_lenient(&self.borough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borough_county_roundtrip() {
        for boro in Borough::all() {
            assert_eq!(Borough::from_county_name(boro.county_name()), Some(*boro));
        }
    }

    #[test]
    fn borough_parses_case_insensitively() {
        assert_eq!(Borough::parse_lenient("MANHATTAN"), Some(Borough::Manhattan));
        assert_eq!(Borough::parse_lenient("brooklyn"), Some(Borough::Brooklyn));
        assert_eq!(
            Borough::parse_lenient("staten island"),
            Some(Borough::StatenIsland)
        );
        assert_eq!(Borough::parse_lenient("Jersey City"), None);
    }

    #[test]
    fn borough_displays_as_feed_string() {
        assert_eq!(Borough::StatenIsland.to_string(), "Staten Island");
        assert_eq!(Borough::Bronx.to_string(), "Bronx");
    }

    #[test]
    fn zip_sentinels_detected() {
        assert!(is_zip_sentinel("0"));
        assert!(is_zip_sentinel("N/A"));
        assert!(!is_zip_sentinel("10001"));
        assert!(!is_zip_sentinel(""));
    }

    #[test]
    fn block_descriptor_serializes_camel_case() {
        let block = BlockDescriptor {
            main: "west 48th street".to_string(),
            cross_1: "6th avenue".to_string(),
            cross_2: "7th avenue".to_string(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["main"], "west 48th street");
        assert_eq!(json["cross1"], "6th avenue");
        assert_eq!(json["cross2"], "7th avenue");
    }
}
