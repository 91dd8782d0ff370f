//! In-memory street centerline index.
//!
//! Loads a street-centerline GeoJSON export and serves polyline lookups by
//! canonical street name. Names are normalized at load time with the same
//! pipeline used on permit addresses, so index and query always agree on
//! the join key.

use std::collections::BTreeMap;
use std::path::Path;

use geo::{LineString, MultiLineString};
use geojson::GeoJson;

use permit_map_normalize::normalize;
use permit_map_permit_models::Borough;

use crate::{GeometryError, StreetGeometryIndex};

/// One centerline record: a street's geometry within one borough/ZIP
/// grouping. A street name can map to several records (the same name
/// exists in multiple boroughs, or the street is split across ZIPs).
#[derive(Debug, Clone)]
pub struct StreetRecord {
    /// Borough this record belongs to, if the export tags one.
    pub borough: Option<Borough>,
    /// ZIP code this record belongs to, if the export tags one.
    pub zip_code: Option<String>,
    /// The centerline geometry.
    pub geometry: MultiLineString<f64>,
}

/// In-memory centerline index keyed by canonical street name.
pub struct StreetCenterlineIndex {
    records: BTreeMap<String, Vec<StreetRecord>>,
}

impl StreetCenterlineIndex {
    /// Loads the index from a GeoJSON file.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the file cannot be read or parsed.
    /// Individual features without a street name or line geometry are
    /// skipped with a warning, not fatal.
    pub fn from_file(path: &Path) -> Result<Self, GeometryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&contents)
    }

    /// Builds the index from GeoJSON text.
    ///
    /// Expects a `FeatureCollection` whose features carry a `street`
    /// property and optional `borough` / `zipcode` properties, with
    /// `LineString` or `MultiLineString` geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the text is not valid GeoJSON.
    pub fn from_geojson_str(contents: &str) -> Result<Self, GeometryError> {
        let geojson: GeoJson = contents.parse()?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Ok(Self {
                records: BTreeMap::new(),
            });
        };

        let mut records: BTreeMap<String, Vec<StreetRecord>> = BTreeMap::new();
        let mut skipped = 0usize;

        for feature in collection.features {
            let Some(name) = string_property(&feature, "street") else {
                skipped += 1;
                continue;
            };
            let Some(geometry) = feature.geometry.clone().and_then(to_multi_line_string) else {
                log::warn!("Skipping centerline feature for {name:?}: no line geometry");
                skipped += 1;
                continue;
            };

            let borough = string_property(&feature, "borough")
                .as_deref()
                .and_then(Borough::parse_lenient);
            let zip_code = string_property(&feature, "zipcode");

            records.entry(normalize(&name)).or_default().push(StreetRecord {
                borough,
                zip_code,
                geometry,
            });
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} unusable centerline features");
        }
        log::info!("Loaded centerlines for {} streets", records.len());

        Ok(Self { records })
    }

    /// Number of distinct street names in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the index holds no streets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records for a street, borough-filtered when possible.
    ///
    /// If a borough is given and any record matches it (or is untagged),
    /// only those records are returned; otherwise every record for the
    /// name is, mirroring how the feed sometimes mislabels boroughs.
    fn candidate_records(&self, street: &str, borough: Option<Borough>) -> Vec<&StreetRecord> {
        let Some(all) = self.records.get(street) else {
            return Vec::new();
        };

        if let Some(borough) = borough {
            let scoped: Vec<&StreetRecord> = all
                .iter()
                .filter(|r| r.borough.is_none_or(|b| b == borough))
                .collect();
            if !scoped.is_empty() {
                return scoped;
            }
        }
        all.iter().collect()
    }

    /// Polylines for a street, preferring records whose ZIP code is in
    /// `zip_codes` when the name is ambiguous.
    ///
    /// A single candidate record always wins outright. With several
    /// candidates, the first one (in load order) whose ZIP matches is
    /// used; if none match, all candidates' geometry is combined.
    #[must_use]
    pub fn lines_for_scoped(
        &self,
        street: &str,
        borough: Option<Borough>,
        zip_codes: &[String],
    ) -> Vec<LineString<f64>> {
        let candidates = self.candidate_records(street, borough);

        if candidates.len() > 1 {
            if let Some(matched) = candidates
                .iter()
                .find(|r| r.zip_code.as_ref().is_some_and(|z| zip_codes.contains(z)))
            {
                return matched.geometry.0.clone();
            }
        }

        candidates
            .iter()
            .flat_map(|r| r.geometry.0.iter().cloned())
            .collect()
    }
}

impl StreetGeometryIndex for StreetCenterlineIndex {
    fn lines_for(&self, street: &str, borough: Option<Borough>) -> Vec<LineString<f64>> {
        self.lines_for_scoped(street, borough, &[])
    }
}

/// Adapter scoping an index's lookups to one permit's ZIP codes, for
/// disambiguating street names that occur in several places.
pub struct ZipScopedIndex<'a> {
    index: &'a StreetCenterlineIndex,
    zip_codes: &'a [String],
}

impl<'a> ZipScopedIndex<'a> {
    /// Wraps `index`, preferring records matching `zip_codes`.
    #[must_use]
    pub const fn new(index: &'a StreetCenterlineIndex, zip_codes: &'a [String]) -> Self {
        Self { index, zip_codes }
    }
}

impl StreetGeometryIndex for ZipScopedIndex<'_> {
    fn lines_for(&self, street: &str, borough: Option<Borough>) -> Vec<LineString<f64>> {
        self.index.lines_for_scoped(street, borough, self.zip_codes)
    }
}

/// Converts a GeoJSON geometry into a [`MultiLineString`], accepting both
/// single and multi line strings.
fn to_multi_line_string(geometry: geojson::Geometry) -> Option<MultiLineString<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::LineString(line) => Some(MultiLineString(vec![line])),
        geo::Geometry::MultiLineString(lines) => Some(lines),
        _ => None,
    }
}

/// Reads a string property off a GeoJSON feature.
fn string_property(feature: &geojson::Feature, key: &str) -> Option<String> {
    feature
        .properties
        .as_ref()?
        .get(key)?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_geojson() -> &'static str {
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"street": "W 48 St", "borough": "Manhattan", "zipcode": "10036"},
                    "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]}
                },
                {
                    "type": "Feature",
                    "properties": {"street": "48 Street", "borough": "Queens", "zipcode": "11101"},
                    "geometry": {"type": "LineString", "coordinates": [[5.0, 5.0], [6.0, 5.0]]}
                },
                {
                    "type": "Feature",
                    "properties": {"street": "Broadway"},
                    "geometry": {
                        "type": "MultiLineString",
                        "coordinates": [[[0.0, 0.0], [0.0, 1.0]], [[0.0, 2.0], [0.0, 3.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"street": "No Geometry"},
                    "geometry": null
                }
            ]
        }"#
    }

    #[test]
    fn indexes_by_normalized_name() {
        let index = StreetCenterlineIndex::from_geojson_str(sample_geojson()).unwrap();
        // "W 48 St" normalizes to "west 48th street"; lookups use the
        // same canonical key.
        let lines = index.lines_for("west 48th street", None);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn multi_part_streets_return_all_polylines() {
        let index = StreetCenterlineIndex::from_geojson_str(sample_geojson()).unwrap();
        let lines = index.lines_for("broadway", None);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn unknown_street_returns_empty() {
        let index = StreetCenterlineIndex::from_geojson_str(sample_geojson()).unwrap();
        assert!(index.lines_for("nonexistent avenue", None).is_empty());
    }

    #[test]
    fn borough_scoping_prefers_matching_records() {
        let index = StreetCenterlineIndex::from_geojson_str(sample_geojson()).unwrap();
        let manhattan = index.lines_for("west 48th street", Some(Borough::Manhattan));
        assert_eq!(manhattan.len(), 1);
        // A wrong borough falls back to every record rather than nothing.
        let bronx = index.lines_for("west 48th street", Some(Borough::Bronx));
        assert_eq!(bronx.len(), 1);
    }

    #[test]
    fn zip_scoping_disambiguates() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"street": "Main Street", "zipcode": "10001"},
                    "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]}
                },
                {
                    "type": "Feature",
                    "properties": {"street": "Main Street", "zipcode": "11201"},
                    "geometry": {"type": "LineString", "coordinates": [[9.0, 9.0], [9.0, 10.0]]}
                }
            ]
        }"#;
        let index = StreetCenterlineIndex::from_geojson_str(geojson).unwrap();

        let zips = vec!["11201".to_string()];
        let scoped = index.lines_for_scoped("main street", None, &zips);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].0[0].x, 9.0);

        // No matching ZIP combines every record.
        let unscoped = index.lines_for("main street", None);
        assert_eq!(unscoped.len(), 2);
    }

    #[test]
    fn skips_featureless_geometry() {
        let index = StreetCenterlineIndex::from_geojson_str(sample_geojson()).unwrap();
        assert!(index.lines_for("no geometry", None).is_empty());
        assert_eq!(index.len(), 3);
    }
}
