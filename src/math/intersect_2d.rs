use super::distance_2d::point_segment_distance;
use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel and collinear segments yield `None`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    // Scale-aware parallel test: the cross product grows with both lengths.
    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE * da.norm().max(1.0) * db.norm().max(1.0) {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    // Use a small epsilon to include endpoints.
    let eps = 1e-9;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns a point shared by two collinear, overlapping segments, if any.
fn collinear_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    let eps = 1e-9;
    [
        (b0, a0, a1),
        (b1, a0, a1),
        (a0, b0, b1),
        (a1, b0, b1),
    ]
    .into_iter()
    .find(|(p, s, e)| point_segment_distance(p, s, e) < eps)
    .map(|(p, _, _)| *p)
    .filter(|_| {
        let da = a1 - a0;
        let db = b1 - b0;
        (da.x * db.y - da.y * db.x).abs() < TOLERANCE * da.norm().max(1.0) * db.norm().max(1.0)
    })
}

/// Finds the first self-intersection of an open ring (closing edge implied).
///
/// Adjacent edges may only share their common vertex; any other contact,
/// including a collinear fold-back between adjacent edges, is reported.
#[must_use]
pub fn ring_self_intersection(ring: &[Point2]) -> Option<Point2> {
    let n = ring.len();
    if n < 3 {
        return None;
    }
    let edge = |i: usize| (&ring[i], &ring[(i + 1) % n]);

    for i in 0..n {
        let (a0, a1) = edge(i);
        for j in (i + 1)..n {
            let (b0, b1) = edge(j);
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Shared vertex is expected; a fold-back along the same line is not.
                let (shared, a_other, b_other) = if j == i + 1 {
                    (a1, a0, b1)
                } else {
                    (a0, a1, b0)
                };
                let da = a_other - shared;
                let db = b_other - shared;
                let cross = da.x * db.y - da.y * db.x;
                if cross.abs() < TOLERANCE * da.norm().max(1.0) * db.norm().max(1.0)
                    && da.dot(&db) > 0.0
                {
                    return Some(*shared);
                }
                continue;
            }
            if let Some((p, _, _)) = segment_segment_intersect_2d(a0, a1, b0, b1) {
                return Some(p);
            }
            if let Some(p) = collinear_overlap(a0, a1, b0, b1) {
                return Some(p);
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let (p, t, u) = segment_segment_intersect_2d(
            &Point2::new(0.0, 500.0),
            &Point2::new(1000.0, 500.0),
            &Point2::new(500.0, 0.0),
            &Point2::new(500.0, 1000.0),
        )
        .unwrap();
        assert!((p.x - 500.0).abs() < 1e-9);
        assert!((p.y - 500.0).abs() < 1e-9);
        assert!((t - 0.5).abs() < 1e-12);
        assert!((u - 0.5).abs() < 1e-12);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1000.0, 0.0),
            &Point2::new(0.0, 500.0),
            &Point2::new(1000.0, 500.0),
        )
        .is_none());
    }

    #[test]
    fn endpoint_touch_is_included() {
        let hit = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(5.0, 0.0),
            &Point2::new(5.0, 0.0),
            &Point2::new(5.0, 5.0),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn line_line_basic() {
        let (t, u) = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(2.0, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 2.0).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn bowtie_self_intersects_at_center() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 1000.0),
            Point2::new(1000.0, 0.0),
            Point2::new(0.0, 1000.0),
        ];
        let p = ring_self_intersection(&bowtie).unwrap();
        assert!((p.x - 500.0).abs() < 1e-6);
        assert!((p.y - 500.0).abs() < 1e-6);
    }

    #[test]
    fn simple_square_has_no_self_intersection() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(1000.0, 1000.0),
            Point2::new(0.0, 1000.0),
        ];
        assert!(ring_self_intersection(&square).is_none());
    }

    #[test]
    fn fold_back_spike_is_reported() {
        let spike = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(500.0, 0.0),
            Point2::new(500.0, 800.0),
        ];
        assert!(ring_self_intersection(&spike).is_some());
    }
}
