use super::Point2;

/// Returns the minimum distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        return (px - ax).hypot(py - ay);
    }

    // Project onto the infinite line, clamp to the segment.
    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    (px - (ax + t * dx)).hypot(py - (ay + t * dy))
}

/// Point-to-segment distance on [`Point2`] values.
#[must_use]
pub fn point_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    point_to_segment_dist(p.x, p.y, a.x, a.y, b.x, b.y)
}

/// Minimum distance from a point to the edges of a closed ring.
#[must_use]
pub fn point_to_ring_dist(p: &Point2, ring: &[Point2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| point_segment_distance(p, &ring[i], &ring[(i + 1) % n]))
        .fold(f64::MAX, f64::min)
}
