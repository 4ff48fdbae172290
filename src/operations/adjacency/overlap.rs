use std::f64::consts::PI;

use crate::geometry::{WallSegment, WallSpan};
use crate::math::distance_2d::{point_at_param, point_to_line_dist, project_param};
use crate::math::Point2;

use super::AdjacencyParams;

/// The common stretch of two collinear segments, on the first one's line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Overlap {
    pub start: Point2,
    pub end: Point2,
    pub length: f64,
}

/// Returns `true` if two directions run the same or exactly opposite way.
///
/// The difference is folded modulo π, so the `atan2` wrap at ±π is handled.
pub(crate) fn is_parallel(angle1: f64, angle2: f64, tolerance: f64) -> bool {
    let d = (angle1 - angle2).rem_euclid(PI);
    d < tolerance || PI - d < tolerance
}

/// Tests two segments for a shared wall and returns the overlap if they are
/// parallel, collinear and overlap by at least `params.min_overlap`.
pub(super) fn shared_span(
    s1: &WallSegment,
    s2: &WallSegment,
    params: &AdjacencyParams,
) -> Option<Overlap> {
    if !is_parallel(s1.angle, s2.angle, params.angle_tolerance) {
        return None;
    }

    let dir = s1.direction();
    if point_to_line_dist(&s2.start, &s1.start, &dir) >= params.distance_tolerance {
        return None;
    }

    // Parameters along s1's line, measured from s1.start.
    let (a0, a1) = (0.0_f64, project_param(&s1.end, &s1.start, &dir));
    let b0 = project_param(&s2.start, &s1.start, &dir);
    let b1 = project_param(&s2.end, &s1.start, &dir);

    let lo = a0.min(a1).max(b0.min(b1));
    let hi = a0.max(a1).min(b0.max(b1));
    if lo >= hi {
        return None;
    }

    let length = hi - lo;
    if length < params.min_overlap {
        return None;
    }

    Some(Overlap {
        start: point_at_param(&s1.start, &dir, lo),
        end: point_at_param(&s1.start, &dir, hi),
        length,
    })
}
