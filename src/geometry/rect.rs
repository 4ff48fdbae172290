use serde::{Deserialize, Serialize};

use crate::math::{Point2, TOLERANCE};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Rect {
    /// Creates a rectangle from its extents, swapping reversed bounds.
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        // NaN must survive for `is_finite` to catch it.
        let (min_x, max_x) = if min_x <= max_x { (min_x, max_x) } else { (max_x, min_x) };
        let (min_y, max_y) = if min_y <= max_y { (min_y, max_y) } else { (max_y, min_y) };
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Creates a rectangle from a top-left corner and a size.
    #[must_use]
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, x + width, y, y + height)
    }

    /// Returns the bounding box of a point set, or `None` if it is empty.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut r = Self::new(first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            r.min_x = r.min_x.min(p.x);
            r.max_x = r.max_x.max(p.x);
            r.min_y = r.min_y.min(p.y);
            r.max_y = r.max_y.max(p.y);
        }
        Some(r)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns `true` if the rectangle has no interior.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() < TOLERANCE || self.height() < TOLERANCE
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    /// Corners in screen-clockwise order: top-left, top-right, bottom-right,
    /// bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min_x, self.min_y),
            Point2::new(self.max_x, self.min_y),
            Point2::new(self.max_x, self.max_y),
            Point2::new(self.min_x, self.max_y),
        ]
    }

    /// Returns the rectangle grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns `true` if the two rectangles overlap or touch.
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Returns `true` if the interiors intersect. Shared edges and corners do
    /// not count.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max_x.min(other.max_x) - self.min_x.max(other.min_x) > TOLERANCE
            && self.max_y.min(other.max_y) - self.min_y.max(other.min_y) > TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_reversed_bounds() {
        let r = Rect::new(10.0, 0.0, 5.0, -5.0);
        assert_eq!(r, Rect::new(0.0, 10.0, -5.0, 5.0));
        assert!((r.area() - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn corners_are_screen_clockwise() {
        let c = Rect::from_origin_size(0.0, 0.0, 2.0, 1.0).corners();
        assert_eq!(c[0], Point2::new(0.0, 0.0));
        assert_eq!(c[1], Point2::new(2.0, 0.0));
        assert_eq!(c[2], Point2::new(2.0, 1.0));
        assert_eq!(c[3], Point2::new(0.0, 1.0));
    }

    #[test]
    fn touching_and_expanded() {
        let a = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_origin_size(100.0, 0.0, 100.0, 100.0);
        let c = Rect::from_origin_size(103.0, 0.0, 100.0, 100.0);
        assert!(a.touches(&b));
        assert!(!a.touches(&c));
        assert!(a.expanded(5.0).touches(&c));
    }

    #[test]
    fn overlap_needs_shared_interior() {
        let a = Rect::new(0.0, 10.0, 0.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 15.0, 5.0, 15.0)));
        assert!(a.overlaps(&a));
        assert!(!a.overlaps(&Rect::new(10.0, 20.0, 0.0, 10.0)));
        assert!(a.touches(&Rect::new(10.0, 20.0, 0.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 20.0, 10.0, 20.0)));
    }

    #[test]
    fn bounds_of_points() {
        let pts = [Point2::new(3.0, -1.0), Point2::new(-2.0, 4.0), Point2::new(0.0, 0.0)];
        assert_eq!(Rect::from_points(&pts), Some(Rect::new(-2.0, 3.0, -1.0, 4.0)));
        assert_eq!(Rect::from_points(&[]), None);
    }

    #[test]
    fn degenerate_detection() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 1.0, 0.0, 1.0).is_degenerate());
        assert!(!Rect::new(0.0, f64::NAN, 0.0, 1.0).is_finite());
    }
}
