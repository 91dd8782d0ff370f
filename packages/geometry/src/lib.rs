#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Street geometry index and block intersection resolution.
//!
//! Given a parsed block (`main` street between two cross streets), this
//! crate looks up line geometry for the three streets, finds the two
//! intersection points, and derives the closure region used to render the
//! closed block on a map. Street geometry comes from any
//! [`StreetGeometryIndex`] implementation; [`index::StreetCenterlineIndex`]
//! is the bundled in-memory one, loaded from a GeoJSON centerline export.

pub mod clip;
pub mod index;
pub mod resolver;
pub mod zones;

use geo::LineString;
use permit_map_permit_models::Borough;

/// Errors loading geometry reference data.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// GeoJSON parsing failed.
    #[error("GeoJSON parse error: {0}")]
    Geojson(#[from] geojson::Error),
}

/// Capability to look up line geometry for a canonical street name.
///
/// Implementations return every polyline known for the street (a street
/// can be discontinuous across a borough), or an empty vector when the
/// street is unknown. Lookups are read-only; batch resolution over many
/// blocks is safe to parallelize.
pub trait StreetGeometryIndex {
    /// Returns the polylines for a street, optionally scoped to a borough.
    fn lines_for(&self, street: &str, borough: Option<Borough>) -> Vec<LineString<f64>>;
}
