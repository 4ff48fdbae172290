use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Point2;

use super::rect::Rect;

/// Host-provided identifier of a shape (room).
///
/// Ordering is lexicographic and is what makes shared-wall ids order
/// independent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Creates a new shape id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The boundary description of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "vertices", rename_all = "camelCase")]
pub enum ShapeOutline {
    /// Axis-aligned rectangle covering `origin .. origin + (width, height)`.
    #[default]
    Rectangle,
    /// Explicit closed loop in shape-local coordinates (relative to `origin`).
    ///
    /// Loops with fewer than 3 usable points fall back to the rectangle.
    Polygon(Vec<Point2>),
}

/// A user-drawn room on the layout canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    /// Top-left corner of the bounding box.
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
    /// Visual rotation. Not applied by any geometry operation: walls,
    /// adjacency and merging all use the unrotated coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<f64>,
    #[serde(default)]
    pub outline: ShapeOutline,
}

impl Shape {
    /// Creates an axis-aligned rectangular shape.
    #[must_use]
    pub fn rectangle(id: impl Into<ShapeId>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            origin: Point2::new(x, y),
            width,
            height,
            rotation_degrees: None,
            outline: ShapeOutline::Rectangle,
        }
    }

    /// Creates a shape with an explicit polygon outline relative to `origin`.
    #[must_use]
    pub fn polygon(
        id: impl Into<ShapeId>,
        origin: Point2,
        width: f64,
        height: f64,
        relative_vertices: Vec<Point2>,
    ) -> Self {
        Self {
            id: id.into(),
            origin,
            width,
            height,
            rotation_degrees: None,
            outline: ShapeOutline::Polygon(relative_vertices),
        }
    }

    /// Sets the visual rotation.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = Some(degrees);
        self
    }

    /// Returns the bounding box described by `origin`, `width` and `height`.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin.x, self.origin.y, self.width, self.height)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn shape_ids_order_lexicographically() {
        let a = ShapeId::from("room-a");
        let b = ShapeId::from("room-b");
        assert!(a < b);
        assert_eq!(a.to_string(), "room-a");
    }

    #[test]
    fn deserialize_rectangle_without_outline() {
        let json = r#"{"id":"lab","origin":[10.0,20.0],"width":100.0,"height":50.0}"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.outline, ShapeOutline::Rectangle);
        assert_eq!(shape.rotation_degrees, None);
        assert_eq!(shape.bounds(), Rect::new(10.0, 110.0, 20.0, 70.0));
    }

    #[test]
    fn deserialize_polygon_outline() {
        let json = r#"{
            "id": "corridor",
            "origin": [0.0, 0.0],
            "width": 20.0,
            "height": 20.0,
            "rotationDegrees": 90.0,
            "outline": {"kind": "polygon", "vertices": [[0.0, 0.0], [20.0, 0.0], [0.0, 20.0]]}
        }"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.rotation_degrees, Some(90.0));
        match shape.outline {
            ShapeOutline::Polygon(ref pts) => assert_eq!(pts.len(), 3),
            ShapeOutline::Rectangle => panic!("expected polygon outline"),
        }
    }
}
