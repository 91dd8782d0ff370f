//! Block intersection resolution.
//!
//! Given a parsed block, finds where each cross street meets the main
//! street and derives the closure region: the portion of the main street
//! inside the circle whose diameter spans the two intersection points.
//! Streets are rarely straight between two cross streets, so this is an
//! approximation of the closed block, not parcel geometry.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Line, LineString, MultiLineString, Point};

use permit_map_permit_models::{BlockDescriptor, Borough};

use crate::clip::clip_to_circle;
use crate::StreetGeometryIndex;

/// The closure region approximating one closed block.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureRegion {
    /// Midpoint of the two intersection points.
    pub center: Point<f64>,
    /// Distance from the center to either intersection point.
    pub radius: f64,
    /// The main street's geometry clipped to the circle.
    pub geometry: MultiLineString<f64>,
}

/// A successfully resolved block: the two bounding intersections and the
/// closure region between them.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionResult {
    /// Where the main street meets the first cross street.
    pub point_1: Point<f64>,
    /// Where the main street meets the second cross street.
    pub point_2: Point<f64>,
    /// The closure region spanning the two points.
    pub region: ClosureRegion,
}

/// Why a block could not be resolved.
///
/// These are expected, non-fatal outcomes: the block is excluded from map
/// rendering but the permit remains usable for every other aggregation.
/// Callers should tally them, not propagate them as failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unresolved {
    /// The geometry index has no polylines for the main street.
    #[error("no geometry for main street {street:?}")]
    MissingMainGeometry {
        /// The street that could not be found.
        street: String,
    },

    /// The geometry index has no polylines for a cross street.
    #[error("no geometry for cross street {street:?}")]
    MissingCrossGeometry {
        /// The street that could not be found.
        street: String,
    },

    /// The cross street's geometry never touches the main street's.
    #[error("{cross:?} does not intersect {main:?}")]
    NoIntersection {
        /// The main street.
        main: String,
        /// The cross street with no crossing.
        cross: String,
    },

    /// Both cross streets meet the main street at the same point, so no
    /// block spans them.
    #[error("cross streets meet the main street at a single point")]
    NoSpan,
}

/// Resolves a block into its two intersection points and closure region.
///
/// # Errors
///
/// Returns [`Unresolved`] when the block has no computable geometry:
/// a street missing from the index, non-intersecting streets, or both
/// cross streets collapsing onto one point.
pub fn resolve<I: StreetGeometryIndex + ?Sized>(
    block: &BlockDescriptor,
    borough: Option<Borough>,
    index: &I,
) -> Result<IntersectionResult, Unresolved> {
    let main_lines = index.lines_for(&block.main, borough);
    if main_lines.is_empty() {
        return Err(Unresolved::MissingMainGeometry {
            street: block.main.clone(),
        });
    }

    let point_1 = cross_point(&main_lines, &block.main, &block.cross_1, borough, index)?;
    let point_2 = cross_point(&main_lines, &block.main, &block.cross_2, borough, index)?;
    if point_1 == point_2 {
        return Err(Unresolved::NoSpan);
    }

    let center = Point::new(
        f64::midpoint(point_1.x(), point_2.x()),
        f64::midpoint(point_1.y(), point_2.y()),
    );
    let radius = distance(center, point_1);
    let geometry = clip_to_circle(&main_lines, center, radius);

    Ok(IntersectionResult {
        point_1,
        point_2,
        region: ClosureRegion {
            center,
            radius,
            geometry,
        },
    })
}

/// Finds where a cross street meets the main street.
fn cross_point<I: StreetGeometryIndex + ?Sized>(
    main_lines: &[LineString<f64>],
    main: &str,
    cross: &str,
    borough: Option<Borough>,
    index: &I,
) -> Result<Point<f64>, Unresolved> {
    let cross_lines = index.lines_for(cross, borough);
    if cross_lines.is_empty() {
        return Err(Unresolved::MissingCrossGeometry {
            street: cross.to_string(),
        });
    }

    first_intersection(main_lines, &cross_lines).ok_or_else(|| Unresolved::NoIntersection {
        main: main.to_string(),
        cross: cross.to_string(),
    })
}

/// The first intersection of two polyline sets in a fixed enumeration
/// order: main polyline, then its segments, then cross polyline, then its
/// segments. Multiple crossings therefore yield a deterministic
/// representative. A collinear overlap (the degenerate case of a cross
/// street running along the main street) contributes its midpoint.
fn first_intersection(
    main: &[LineString<f64>],
    cross: &[LineString<f64>],
) -> Option<Point<f64>> {
    for main_line in main {
        for main_segment in main_line.lines() {
            for cross_line in cross {
                for cross_segment in cross_line.lines() {
                    if let Some(hit) = line_intersection(main_segment, cross_segment) {
                        return Some(representative(hit));
                    }
                }
            }
        }
    }
    None
}

/// Collapses an intersection to a single representative point.
fn representative(hit: LineIntersection<f64>) -> Point<f64> {
    match hit {
        LineIntersection::SinglePoint { intersection, .. } => intersection.into(),
        LineIntersection::Collinear { intersection } => midpoint(intersection),
    }
}

fn midpoint(line: Line<f64>) -> Point<f64> {
    Point::new(
        f64::midpoint(line.start.x, line.end.x),
        f64::midpoint(line.start.y, line.end.y),
    )
}

fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (a.x() - b.x()).hypot(a.y() - b.y())
}
