//! In-memory ZIP-code boundary index.
//!
//! Loads ZIP polygon boundaries from GeoJSON, builds an R-tree over their
//! envelopes, and answers "which ZIP codes does this geometry touch"
//! queries used to attribute street segments to ZIP codes for the
//! choropleth consumer.

use std::path::Path;

use geo::{BoundingRect, Contains, Intersects, MultiLineString, MultiPolygon};
use geojson::GeoJson;
use rstar::{AABB, RTree, RTreeObject};

use crate::GeometryError;

/// A ZIP boundary polygon stored in the R-tree with its ZIP code.
struct ZoneEntry {
    zip_code: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over ZIP-code boundary polygons.
///
/// Constructed once and shared read-only across all consumers.
pub struct ZipBoundaryIndex {
    zones: RTree<ZoneEntry>,
    len: usize,
}

impl ZipBoundaryIndex {
    /// Loads ZIP boundaries from a GeoJSON file.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, GeometryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&contents)
    }

    /// Builds the index from GeoJSON text: a `FeatureCollection` whose
    /// features carry a `zipcode` property and polygon geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the text is not valid GeoJSON.
    /// Features without a ZIP code or polygon geometry are skipped with a
    /// warning.
    pub fn from_geojson_str(contents: &str) -> Result<Self, GeometryError> {
        let geojson: GeoJson = contents.parse()?;
        let mut entries = Vec::new();

        if let GeoJson::FeatureCollection(collection) = geojson {
            for feature in collection.features {
                let Some(zip_code) = feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("zipcode"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                else {
                    log::warn!("Skipping ZIP boundary feature without a zipcode property");
                    continue;
                };

                let Some(polygon) = feature.geometry.and_then(to_multi_polygon) else {
                    log::warn!("Skipping ZIP boundary {zip_code}: no polygon geometry");
                    continue;
                };

                let envelope = compute_envelope(&polygon);
                entries.push(ZoneEntry {
                    zip_code,
                    envelope,
                    polygon,
                });
            }
        }

        let len = entries.len();
        log::info!("Loaded {len} ZIP boundaries into spatial index");
        Ok(Self {
            zones: RTree::bulk_load(entries),
            len,
        })
    }

    /// Number of ZIP boundaries in the index.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index holds no boundaries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// ZIP codes whose boundary intersects the given line geometry,
    /// sorted for deterministic output.
    #[must_use]
    pub fn zips_intersecting(&self, geometry: &MultiLineString<f64>) -> Vec<&str> {
        let Some(rect) = geometry.bounding_rect() else {
            return Vec::new();
        };
        let query_env =
            AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        let mut zips: Vec<&str> = self
            .zones
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.intersects(geometry))
            .map(|entry| entry.zip_code.as_str())
            .collect();
        zips.sort_unstable();
        zips
    }

    /// Looks up the ZIP code containing a point. ZIP boundaries tile the
    /// city without meaningful overlap, so the first match wins.
    #[must_use]
    pub fn zip_for_point(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.zones
            .locate_in_envelope_intersecting(&query_env)
            .find(|entry| entry.polygon.contains(&point))
            .map(|entry| entry.zip_code.as_str())
    }
}

/// Parses a GeoJSON geometry into a [`MultiPolygon`], accepting both
/// `Polygon` and `MultiPolygon` geometry types.
fn to_multi_polygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Computes the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;

    /// Two unit-square ZIP zones side by side: 10001 covers x in [0, 1],
    /// 10002 covers x in [1, 2].
    fn two_zone_geojson() -> &'static str {
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"zipcode": "10001"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"zipcode": "10002"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0], [1.0, 0.0]]]
                    }
                }
            ]
        }"#
    }

    #[test]
    fn line_spanning_zones_reports_both() {
        let index = ZipBoundaryIndex::from_geojson_str(two_zone_geojson()).unwrap();
        let line = MultiLineString(vec![LineString::from(vec![(0.5, 0.5), (1.5, 0.5)])]);
        assert_eq!(index.zips_intersecting(&line), vec!["10001", "10002"]);
    }

    #[test]
    fn line_in_one_zone_reports_one() {
        let index = ZipBoundaryIndex::from_geojson_str(two_zone_geojson()).unwrap();
        let line = MultiLineString(vec![LineString::from(vec![(0.2, 0.5), (0.8, 0.5)])]);
        assert_eq!(index.zips_intersecting(&line), vec!["10001"]);
    }

    #[test]
    fn line_outside_all_zones_reports_none() {
        let index = ZipBoundaryIndex::from_geojson_str(two_zone_geojson()).unwrap();
        let line = MultiLineString(vec![LineString::from(vec![(5.0, 5.0), (6.0, 5.0)])]);
        assert!(index.zips_intersecting(&line).is_empty());
    }

    #[test]
    fn point_lookup_finds_containing_zone() {
        let index = ZipBoundaryIndex::from_geojson_str(two_zone_geojson()).unwrap();
        assert_eq!(index.zip_for_point(0.5, 0.5), Some("10001"));
        assert_eq!(index.zip_for_point(1.5, 0.5), Some("10002"));
        assert_eq!(index.zip_for_point(5.0, 5.0), None);
    }

    #[test]
    fn skips_features_without_zipcode() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    }
                }
            ]
        }"#;
        let index = ZipBoundaryIndex::from_geojson_str(geojson).unwrap();
        assert!(index.is_empty());
    }
}
