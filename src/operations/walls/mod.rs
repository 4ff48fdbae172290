mod polygon;
mod segments;

pub use polygon::extract_polygon;
pub use segments::build_wall_segments;

use crate::geometry::{Shape, WallSegment};

/// Returns the boundary segments of a single shape.
#[must_use]
pub fn shape_walls(shape: &Shape) -> Vec<WallSegment> {
    build_wall_segments(&shape.id, &extract_polygon(shape))
}

/// Returns the boundary segments of every shape, in input order.
#[must_use]
pub fn extract_walls(shapes: &[Shape]) -> Vec<WallSegment> {
    shapes.iter().flat_map(shape_walls).collect()
}
