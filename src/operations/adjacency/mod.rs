mod broad_phase;
mod overlap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::{Shape, ShapeId, SharedWall, SharedWallId, WallSegment};
use crate::operations::walls::shape_walls;

use broad_phase::BroadPhase;

pub(crate) use overlap::is_parallel;

/// Tolerances controlling shared-wall detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyParams {
    /// Maximum angular deviation (radians) for two edges to count as parallel.
    pub angle_tolerance: f64,
    /// Maximum perpendicular gap between two edges' supporting lines.
    pub distance_tolerance: f64,
    /// Overlaps shorter than this are corner contacts, not walls.
    pub min_overlap: f64,
    /// Skip shape pairs whose bounding boxes, grown by `distance_tolerance`,
    /// do not touch.
    ///
    /// Off by default: a near-parallel edge can pass the collinearity test
    /// through its start point alone, and such matches are lost when the
    /// pair is pruned.
    pub broad_phase: bool,
}

impl Default for AdjacencyParams {
    fn default() -> Self {
        Self {
            angle_tolerance: 0.1,
            distance_tolerance: 5.0,
            min_overlap: 10.0,
            broad_phase: false,
        }
    }
}

impl AdjacencyParams {
    #[must_use]
    pub fn with_angle_tolerance(mut self, radians: f64) -> Self {
        self.angle_tolerance = radians;
        self
    }

    #[must_use]
    pub fn with_distance_tolerance(mut self, distance: f64) -> Self {
        self.distance_tolerance = distance;
        self
    }

    #[must_use]
    pub fn with_min_overlap(mut self, length: f64) -> Self {
        self.min_overlap = length;
        self
    }

    #[must_use]
    pub fn with_broad_phase(mut self, enabled: bool) -> Self {
        self.broad_phase = enabled;
        self
    }
}

/// Detects every wall shared by two shapes of a layout snapshot.
///
/// Shapes are compared pairwise in input order and, within a pair, edge by
/// edge in loop order, so the output is fully determined by the input.
/// `shape1` of each result is the shape that comes first in the input and
/// its edge supplies the wall's orientation.
pub struct DetectSharedWalls<'a> {
    shapes: &'a [Shape],
    params: AdjacencyParams,
}

impl<'a> DetectSharedWalls<'a> {
    /// Creates a new detection over `shapes` with default tolerances.
    #[must_use]
    pub fn new(shapes: &'a [Shape]) -> Self {
        Self {
            shapes,
            params: AdjacencyParams::default(),
        }
    }

    /// Sets custom tolerances.
    #[must_use]
    pub fn with_params(mut self, params: AdjacencyParams) -> Self {
        self.params = params;
        self
    }

    /// Runs the detection.
    #[must_use]
    pub fn execute(&self) -> Vec<SharedWall> {
        let walls: Vec<Vec<WallSegment>> = self.shapes.iter().map(shape_walls).collect();
        let broad = self
            .params
            .broad_phase
            .then(|| BroadPhase::new(&walls, self.params.distance_tolerance));

        let mut result = Vec::new();
        for i in 0..self.shapes.len() {
            for j in (i + 1)..self.shapes.len() {
                if let Some(bp) = &broad {
                    if !bp.may_touch(i, j) {
                        continue;
                    }
                }
                pair_walls(
                    &self.shapes[i].id,
                    &walls[i],
                    &self.shapes[j].id,
                    &walls[j],
                    &self.params,
                    &mut result,
                );
            }
        }

        debug!(
            shapes = self.shapes.len(),
            shared_walls = result.len(),
            "shared wall detection finished"
        );
        result
    }
}

/// Appends every wall shared by one pair of shapes.
fn pair_walls(
    first: &ShapeId,
    first_walls: &[WallSegment],
    second: &ShapeId,
    second_walls: &[WallSegment],
    params: &AdjacencyParams,
    out: &mut Vec<SharedWall>,
) {
    let mut ordinal = 0;
    for s1 in first_walls {
        for s2 in second_walls {
            let Some(ov) = overlap::shared_span(s1, s2, params) else {
                continue;
            };
            trace!(%first, %second, length = ov.length, "edges overlap");
            out.push(SharedWall {
                id: SharedWallId::for_pair(first, second, ordinal),
                shape1: first.clone(),
                shape2: second.clone(),
                start: ov.start,
                end: ov.end,
                midpoint: nalgebra::center(&ov.start, &ov.end),
                length: ov.length,
                angle: s1.angle,
                normal: s1.normal,
            });
            ordinal += 1;
        }
    }
}

/// Detects shared walls with default tolerances.
#[must_use]
pub fn detect_shared_walls(shapes: &[Shape]) -> Vec<SharedWall> {
    DetectSharedWalls::new(shapes).execute()
}

/// Returns every wall shared by shapes `a` and `b`, in detection order.
///
/// Only that pair is examined. Each wall is identical (id and orientation
/// included) to the one [`DetectSharedWalls`] reports for the same
/// snapshot. Empty if either shape is missing or they do not touch.
#[must_use]
pub fn shared_walls_between(
    shapes: &[Shape],
    a: &ShapeId,
    b: &ShapeId,
    params: &AdjacencyParams,
) -> Vec<SharedWall> {
    let mut found = Vec::new();
    let (Some(ia), Some(ib)) = (
        shapes.iter().position(|s| &s.id == a),
        shapes.iter().position(|s| &s.id == b),
    ) else {
        return found;
    };
    if ia == ib {
        return found;
    }
    let (first, second) = (&shapes[ia.min(ib)], &shapes[ia.max(ib)]);
    pair_walls(
        &first.id,
        &shape_walls(first),
        &second.id,
        &shape_walls(second),
        params,
        &mut found,
    );
    found
}

/// Finds the longest wall shared by shapes `a` and `b`.
///
/// Ties keep the earlier wall. See [`shared_walls_between`].
#[must_use]
pub fn find_shared_wall(
    shapes: &[Shape],
    a: &ShapeId,
    b: &ShapeId,
    params: &AdjacencyParams,
) -> Option<SharedWall> {
    shared_walls_between(shapes, a, b, params)
        .into_iter()
        .fold(None, |best, wall| match best {
            Some(kept) if kept.length >= wall.length => Some(kept),
            _ => Some(wall),
        })
}
