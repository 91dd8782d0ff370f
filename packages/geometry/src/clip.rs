//! Clipping polylines to a circle.
//!
//! The closure region is "the part of the main street inside the circle
//! spanning the two intersections". Clipping a polyline to a circle only
//! needs per-segment quadratic intersection; contiguous surviving pieces
//! are stitched back together so a straight block stays one polyline.

use geo::{Coord, Line, LineString, MultiLineString, Point};

/// Clips polylines to the disc of the given center and radius.
///
/// Each input polyline contributes zero or more output polylines: the
/// maximal runs of its length that lie inside the disc. Tangent touches
/// (zero-length pieces) are dropped. Output order follows input order.
#[must_use]
pub fn clip_to_circle(
    lines: &[LineString<f64>],
    center: Point<f64>,
    radius: f64,
) -> MultiLineString<f64> {
    let mut clipped: Vec<LineString<f64>> = Vec::new();

    for line in lines {
        let mut current: Vec<Coord<f64>> = Vec::new();

        for segment in line.lines() {
            match clip_segment(segment, center, radius) {
                Some((start, end)) => {
                    if current.last() == Some(&start) {
                        current.push(end);
                    } else {
                        flush(&mut clipped, &mut current);
                        current.push(start);
                        current.push(end);
                    }
                }
                None => flush(&mut clipped, &mut current),
            }
        }
        flush(&mut clipped, &mut current);
    }

    MultiLineString(clipped)
}

/// Clips one segment to the disc, returning the surviving sub-segment's
/// endpoints, or `None` if the segment misses the disc (or only touches
/// it tangentially).
fn clip_segment(segment: Line<f64>, center: Point<f64>, radius: f64) -> Option<(Coord<f64>, Coord<f64>)> {
    let a = segment.start;
    let d = Coord {
        x: segment.end.x - a.x,
        y: segment.end.y - a.y,
    };
    let f = Coord {
        x: a.x - center.x(),
        y: a.y - center.y(),
    };

    let dd = d.x.mul_add(d.x, d.y * d.y);
    if dd == 0.0 {
        // Zero-length segment; nothing to contribute.
        return None;
    }

    let fd = f.x.mul_add(d.x, f.y * d.y);
    let ff = f.x.mul_add(f.x, f.y * f.y);
    let discriminant = fd.mul_add(fd, -(dd * (ff - radius * radius)));
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t_enter = ((-fd - sqrt_disc) / dd).max(0.0);
    let t_exit = ((-fd + sqrt_disc) / dd).min(1.0);
    if t_enter >= t_exit {
        return None;
    }

    Some((point_at(segment, t_enter), point_at(segment, t_exit)))
}

/// The point at parameter `t` along a segment, with the endpoints returned
/// exactly so shared vertices stitch bitwise.
fn point_at(segment: Line<f64>, t: f64) -> Coord<f64> {
    if t == 0.0 {
        return segment.start;
    }
    if t == 1.0 {
        return segment.end;
    }
    Coord {
        x: (segment.end.x - segment.start.x).mul_add(t, segment.start.x),
        y: (segment.end.y - segment.start.y).mul_add(t, segment.start.y),
    }
}

fn flush(clipped: &mut Vec<LineString<f64>>, current: &mut Vec<Coord<f64>>) {
    if current.len() >= 2 {
        clipped.push(LineString(std::mem::take(current)));
    } else {
        current.clear();
    }
}
