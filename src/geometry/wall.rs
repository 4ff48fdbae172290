use std::f64::consts::FRAC_PI_2;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

use super::shape::ShapeId;

/// A straight wall with a start and an end point.
///
/// Implemented by both per-shape [`WallSegment`]s and detected
/// [`SharedWall`]s so door placement works on either.
pub trait WallSpan {
    /// Start point of the wall.
    fn start(&self) -> Point2;

    /// End point of the wall.
    fn end(&self) -> Point2;

    /// Direction angle in radians, `atan2(dy, dx)`.
    fn angle(&self) -> f64;

    /// Unit vector along the wall.
    fn direction(&self) -> Vector2 {
        let a = self.angle();
        Vector2::new(a.cos(), a.sin())
    }

    /// Length of the wall.
    fn length(&self) -> f64 {
        (self.end() - self.start()).norm()
    }
}

/// Returns the unit normal rotated +90° from `angle`.
#[must_use]
pub fn normal_from_angle(angle: f64) -> Vector2 {
    Vector2::new((angle + FRAC_PI_2).cos(), (angle + FRAC_PI_2).sin())
}

/// One boundary edge of a shape, oriented along the shape's vertex loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    /// Shape whose boundary this edge belongs to.
    pub owner: ShapeId,
    pub start: Point2,
    pub end: Point2,
    pub midpoint: Point2,
    pub length: f64,
    /// Radians, `atan2(dy, dx)`.
    pub angle: f64,
    /// Unit vector at `angle + π/2`.
    pub normal: Vector2,
}

impl WallSegment {
    /// Builds a segment and derives its midpoint, length, angle and normal.
    #[must_use]
    pub fn from_endpoints(owner: ShapeId, start: Point2, end: Point2) -> Self {
        let d = end - start;
        let angle = d.y.atan2(d.x);
        Self {
            owner,
            start,
            end,
            midpoint: nalgebra::center(&start, &end),
            length: d.norm(),
            angle,
            normal: normal_from_angle(angle),
        }
    }
}

impl WallSpan for WallSegment {
    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn length(&self) -> f64 {
        self.length
    }
}

/// Deterministic identifier of a shared wall.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedWallId(String);

impl SharedWallId {
    /// Builds the id for the `ordinal`-th wall shared by `a` and `b`.
    ///
    /// The pair is sorted first, so `(a, b)` and `(b, a)` yield the same id.
    /// The first wall of a pair (`ordinal == 0`) carries no suffix.
    #[must_use]
    pub fn for_pair(a: &ShapeId, b: &ShapeId, ordinal: usize) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if ordinal == 0 {
            Self(format!("shared:{lo}:{hi}"))
        } else {
            Self(format!("shared:{lo}:{hi}:{ordinal}"))
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharedWallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The overlapping stretch of two shapes' boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedWall {
    pub id: SharedWallId,
    pub shape1: ShapeId,
    pub shape2: ShapeId,
    pub start: Point2,
    pub end: Point2,
    pub midpoint: Point2,
    pub length: f64,
    /// Orientation taken from `shape1`'s edge.
    pub angle: f64,
    pub normal: Vector2,
}

impl SharedWall {
    /// Returns `true` if the wall separates `a` and `b`, in either order.
    #[must_use]
    pub fn connects(&self, a: &ShapeId, b: &ShapeId) -> bool {
        (&self.shape1 == a && &self.shape2 == b) || (&self.shape1 == b && &self.shape2 == a)
    }
}

impl WallSpan for SharedWall {
    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn length(&self) -> f64 {
        self.length
    }
}
