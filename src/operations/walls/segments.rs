use crate::geometry::{ShapeId, WallSegment};
use crate::math::{Point2, TOLERANCE};

/// Emits one wall segment per edge of a closed vertex loop, including the
/// closing edge from the last vertex back to the first.
///
/// Zero-length edges (repeated consecutive points) are skipped.
#[must_use]
pub fn build_wall_segments(owner: &ShapeId, points: &[Point2]) -> Vec<WallSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(n);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if (b - a).norm_squared() < TOLERANCE * TOLERANCE {
            continue;
        }
        segments.push(WallSegment::from_endpoints(owner.clone(), a, b));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn square_yields_four_oriented_segments() {
        let owner = ShapeId::from("a");
        let pts = [p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0), p(0.0, 100.0)];
        let segs = build_wall_segments(&owner, &pts);
        assert_eq!(segs.len(), 4);

        let angles: Vec<f64> = segs.iter().map(|s| s.angle).collect();
        assert!(angles[0].abs() < 1e-12);
        assert!((angles[1] - FRAC_PI_2).abs() < 1e-12);
        assert!((angles[2] - PI).abs() < 1e-12);
        assert!((angles[3] + FRAC_PI_2).abs() < 1e-12);

        // Closing edge runs from the last vertex to the first.
        assert_eq!(segs[3].start, p(0.0, 100.0));
        assert_eq!(segs[3].end, p(0.0, 0.0));
        assert!(segs.iter().all(|s| s.owner == owner));
    }

    #[test]
    fn duplicate_points_are_dropped() {
        let owner = ShapeId::from("dup");
        let pts = [p(0.0, 0.0), p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 0.0)];
        let segs = build_wall_segments(&owner, &pts);
        // (0,0)->(0,0) and the closing (0,0)->(0,0) vanish.
        assert_eq!(segs.len(), 3);
        assert!(segs.iter().all(|s| s.length > 0.0));
    }

    #[test]
    fn too_few_points() {
        assert!(build_wall_segments(&ShapeId::from("x"), &[p(1.0, 1.0)]).is_empty());
    }
}
