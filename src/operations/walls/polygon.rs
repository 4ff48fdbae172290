use tracing::warn;

use crate::geometry::{Shape, ShapeOutline};
use crate::math::Point2;

/// Converts a shape into its closed boundary loop in absolute coordinates.
///
/// Polygon outlines keep their vertex order, which fixes the wall numbering.
/// Rectangles (and polygons with fewer than 3 finite points) yield
/// top-left, top-right, bottom-right, bottom-left. Rotation is not applied.
#[must_use]
pub fn extract_polygon(shape: &Shape) -> Vec<Point2> {
    match &shape.outline {
        ShapeOutline::Polygon(relative) => {
            let absolute: Vec<Point2> = relative
                .iter()
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .map(|p| Point2::new(shape.origin.x + p.x, shape.origin.y + p.y))
                .collect();
            if absolute.len() >= 3 {
                return absolute;
            }
            warn!(
                shape = %shape.id,
                points = absolute.len(),
                "polygon outline has fewer than 3 usable points, using bounding rectangle"
            );
            shape.bounds().corners().to_vec()
        }
        ShapeOutline::Rectangle => shape.bounds().corners().to_vec(),
    }
}
