use super::{Point2, Vector2, TOLERANCE};

/// Returns the perpendicular distance from `p` to the infinite line through
/// `origin` with unit direction `dir`.
#[must_use]
pub fn point_to_line_dist(p: &Point2, origin: &Point2, dir: &Vector2) -> f64 {
    let d = p - origin;
    (dir.x * d.y - dir.y * d.x).abs()
}

/// Returns the minimum distance from `p` to the segment `a`→`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();

    if len_sq < TOLERANCE * TOLERANCE {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Signed distance of `p`'s projection along the line through `origin` with
/// unit direction `dir`.
#[must_use]
pub fn project_param(p: &Point2, origin: &Point2, dir: &Vector2) -> f64 {
    (p - origin).dot(dir)
}

/// Point at parameter `t` on the line through `origin` with unit direction
/// `dir`. Inverse of [`project_param`] for points on the line.
#[must_use]
pub fn point_at_param(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}
