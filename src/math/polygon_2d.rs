use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise in a y-up frame, which reads as clockwise on
/// screen (y-down).
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Rotates a closed polygon so it starts at the topmost vertex (smallest y),
/// breaking ties by smallest x.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.y < b.y - TOLERANCE || (pt.y - b.y).abs() < TOLERANCE && pt.x < b.x {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Returns `true` if `b` lies on the line through `a` and `c`.
#[must_use]
pub fn is_collinear(a: &Point2, b: &Point2, c: &Point2) -> bool {
    let ab = b - a;
    let bc = c - b;
    (ab.x * bc.y - ab.y * bc.x).abs() < TOLERANCE
}

/// Removes every vertex that lies on the line through its neighbours,
/// treating the input as a closed loop.
///
/// Repeats until stable so runs of collinear points collapse to their ends.
#[must_use]
pub fn remove_collinear(points: &[Point2]) -> Vec<Point2> {
    let mut pts = points.to_vec();
    loop {
        let n = pts.len();
        if n < 3 {
            return pts;
        }
        let Some(i) = (0..n).find(|&i| {
            let prev = &pts[(i + n - 1) % n];
            let next = &pts[(i + 1) % n];
            is_collinear(prev, &pts[i], next)
        }) else {
            return pts;
        };
        pts.remove(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn signed_area_screen_clockwise_square() {
        // TL, TR, BR, BL in y-down coordinates.
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_reversed_square() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[p(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0)];
        let rotated = rotate_to_canonical_start(&pts);
        assert_eq!(rotated[0], p(0.0, 0.0));
        assert_eq!(rotated[1], p(1.0, 0.0));
    }

    #[test]
    fn collinear_run_collapses() {
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(3.0, 0.0),
            p(3.0, 1.0),
            p(0.0, 1.0),
        ];
        let out = remove_collinear(&pts);
        assert_eq!(out, vec![p(0.0, 0.0), p(3.0, 0.0), p(3.0, 1.0), p(0.0, 1.0)]);
    }

    #[test]
    fn collinear_wraps_around_start() {
        // The first vertex sits in the middle of the closing edge.
        let pts = vec![p(0.0, 0.5), p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        let out = remove_collinear(&pts);
        assert_eq!(out.len(), 4);
        assert!(!out.contains(&p(0.0, 0.5)));
    }
}
