mod drag;
mod placement;
mod store;

pub use drag::{DoorDrag, DragOutcome, DragParams};
pub use placement::{
    DoorId, DoorPlacement, DoorSpec, FlowDirection, FlowType, UnidirectionalDirection,
};
pub use store::DoorStore;

use crate::geometry::{SharedWall, WallSpan};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{Point2, TOLERANCE};

/// A point snapped onto a wall together with its normalized location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallProjection {
    pub position: Point2,
    /// `0` at the wall's start, `1` at its end.
    pub normalized_position: f64,
}

/// Projects `point` onto `wall`, clamped to the wall's extent.
///
/// A zero-length wall projects everything onto its start with `t = 0`.
#[must_use]
pub fn project_point_onto_wall<W: WallSpan + ?Sized>(wall: &W, point: &Point2) -> WallProjection {
    let start = wall.start();
    let d = wall.end() - start;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return WallProjection {
            position: start,
            normalized_position: 0.0,
        };
    }

    let t = ((point - start).dot(&d) / len_sq).clamp(0.0, 1.0);
    WallProjection {
        position: start + d * t,
        normalized_position: t,
    }
}

/// Returns the point at normalized location `t` along `wall`.
///
/// `t` is clamped to `[0, 1]`; NaN maps to the start.
#[must_use]
pub fn position_from_normalized<W: WallSpan + ?Sized>(wall: &W, t: f64) -> Point2 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let start = wall.start();
    start + (wall.end() - start) * t
}

/// The two ends of a door of `width` centred on `position`, laid out along
/// the wall direction.
#[must_use]
pub fn door_endpoints<W: WallSpan + ?Sized>(wall: &W, position: &Point2, width: f64) -> (Point2, Point2) {
    let half = wall.direction() * (width * 0.5);
    (position - half, position + half)
}

/// Returns the shared wall closest to `point`, if any lies within
/// `max_distance`. Ties go to the earlier wall.
#[must_use]
pub fn pick_wall<'a>(walls: &'a [SharedWall], point: &Point2, max_distance: f64) -> Option<&'a SharedWall> {
    let mut best: Option<(&SharedWall, f64)> = None;
    for wall in walls {
        let d = point_to_segment_dist(point, &wall.start, &wall.end);
        if d > max_distance {
            continue;
        }
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((wall, d)),
        }
    }
    best.map(|(w, _)| w)
}
