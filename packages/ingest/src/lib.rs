#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline functions for the ingestion CLI.
//!
//! Raw feed rows are built into permits (skipping and logging malformed
//! records), each permit's blocks are resolved against the street
//! geometry index, and the resolved closures are exported as GeoJSON for
//! the map consumer.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

use permit_map_geometry::index::{StreetCenterlineIndex, ZipScopedIndex};
use permit_map_geometry::resolver::{self, IntersectionResult, Unresolved};
use permit_map_geometry::zones::ZipBoundaryIndex;
use permit_map_permit_models::{BlockDescriptor, Permit};
use permit_map_source::record::{RawPermitRecord, build_permit};

/// One successfully resolved block with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedClosure {
    /// Permit the block belongs to.
    pub permit_id: String,
    /// Position of the block within the permit.
    pub block_index: usize,
    /// The parsed street triplet.
    pub block: BlockDescriptor,
    /// The resolved intersection points and closure region.
    pub result: IntersectionResult,
}

/// Tallies from a resolution pass. Unresolved blocks are expected
/// outcomes, tracked here for observability rather than surfaced as
/// errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Blocks resolved to geometry.
    pub resolved: usize,
    /// Blocks that never parsed (no street names to resolve).
    pub unparsed: usize,
    /// Main street missing from the index.
    pub missing_main: usize,
    /// A cross street missing from the index.
    pub missing_cross: usize,
    /// Streets present but never intersecting.
    pub no_intersection: usize,
    /// Cross streets collapsing onto a single point.
    pub no_span: usize,
}

impl ResolutionStats {
    /// Total number of blocks that produced no geometry.
    #[must_use]
    pub const fn unresolved(&self) -> usize {
        self.unparsed + self.missing_main + self.missing_cross + self.no_intersection + self.no_span
    }

    fn record(&mut self, reason: &Unresolved) {
        match reason {
            Unresolved::MissingMainGeometry { .. } => self.missing_main += 1,
            Unresolved::MissingCrossGeometry { .. } => self.missing_cross += 1,
            Unresolved::NoIntersection { .. } => self.no_intersection += 1,
            Unresolved::NoSpan => self.no_span += 1,
        }
    }
}

/// Builds permits from raw rows, skipping malformed records.
///
/// Each failure is logged with its field and permit id; the batch
/// continues. Returns the built permits in input order.
#[must_use]
pub fn build_permits(rows: &[RawPermitRecord]) -> Vec<Permit> {
    let mut permits = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        match build_permit(row) {
            Ok(permit) => permits.push(permit),
            Err(e) => {
                log::warn!("Skipping record: {e}");
                skipped += 1;
            }
        }
    }

    log::info!(
        "Built {} permits from {} raw rows ({skipped} skipped)",
        permits.len(),
        rows.len()
    );
    permits
}

/// Resolves every parsed block of every permit against the street index.
///
/// Lookups are scoped to each permit's borough and ZIP codes. Unresolved
/// blocks are tallied and logged at debug level; they are normal outcomes,
/// not failures.
#[must_use]
pub fn resolve_closures(
    permits: &[Permit],
    index: &StreetCenterlineIndex,
) -> (Vec<ResolvedClosure>, ResolutionStats) {
    let mut closures = Vec::new();
    let mut stats = ResolutionStats::default();

    for permit in permits {
        let borough = permit.borough_enum();
        let scoped = ZipScopedIndex::new(index, &permit.zip_codes);

        for (block_index, block) in permit.blocks.iter().enumerate() {
            let Some(block) = block else {
                stats.unparsed += 1;
                continue;
            };

            match resolver::resolve(block, borough, &scoped) {
                Ok(result) => {
                    stats.resolved += 1;
                    closures.push(ResolvedClosure {
                        permit_id: permit.id.clone(),
                        block_index,
                        block: block.clone(),
                        result,
                    });
                }
                Err(reason) => {
                    log::debug!("Permit {} block {block_index}: {reason}", permit.id);
                    stats.record(&reason);
                }
            }
        }
    }

    log::info!(
        "Resolved {} closures ({} unresolved: {} unparsed, {} missing main, \
         {} missing cross, {} no intersection, {} no span)",
        stats.resolved,
        stats.unresolved(),
        stats.unparsed,
        stats.missing_main,
        stats.missing_cross,
        stats.no_intersection,
        stats.no_span
    );

    (closures, stats)
}

/// Exports resolved closures as a GeoJSON feature collection.
///
/// Each feature carries the clipped closure geometry plus the permit id,
/// block position, street names, and circle parameters. When a ZIP
/// boundary index is supplied, each feature is also attributed with the
/// ZIP codes its geometry touches.
#[must_use]
pub fn closures_to_geojson(
    closures: &[ResolvedClosure],
    zones: Option<&ZipBoundaryIndex>,
) -> FeatureCollection {
    let features = closures
        .iter()
        .map(|closure| {
            let mut properties = JsonObject::new();
            properties.insert("permitId".to_string(), closure.permit_id.clone().into());
            properties.insert("blockIndex".to_string(), closure.block_index.into());
            properties.insert("main".to_string(), closure.block.main.clone().into());
            properties.insert("cross1".to_string(), closure.block.cross_1.clone().into());
            properties.insert("cross2".to_string(), closure.block.cross_2.clone().into());
            properties.insert(
                "centerLng".to_string(),
                closure.result.region.center.x().into(),
            );
            properties.insert(
                "centerLat".to_string(),
                closure.result.region.center.y().into(),
            );
            properties.insert("radius".to_string(), closure.result.region.radius.into());

            if let Some(zones) = zones {
                let zips: Vec<JsonValue> = zones
                    .zips_intersecting(&closure.result.region.geometry)
                    .into_iter()
                    .map(Into::into)
                    .collect();
                properties.insert("zipCodes".to_string(), zips.into());
            }

            Feature {
                bbox: None,
                geometry: Some(Geometry::new((&closure.result.region.geometry).into())),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
