use super::distance_2d::point_to_segment_dist;
use super::{Point2, Vector2, TOLERANCE};

/// Where a point lies relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Boundary,
    Outside,
}

/// Computes the signed area of an open ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring must not
/// repeat its first vertex at the end.
#[must_use]
pub fn signed_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += ring[i].x * ring[j].y - ring[j].x * ring[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the ring winds counter-clockwise.
#[must_use]
pub fn is_ccw(ring: &[Point2]) -> bool {
    signed_area(ring) > 0.0
}

/// Returns the ring with counter-clockwise winding.
#[must_use]
pub fn ensure_ccw(ring: &[Point2]) -> Vec<Point2> {
    if signed_area(ring) < 0.0 {
        ring.iter().rev().copied().collect()
    } else {
        ring.to_vec()
    }
}

/// Returns the ring with clockwise winding.
#[must_use]
pub fn ensure_cw(ring: &[Point2]) -> Vec<Point2> {
    if signed_area(ring) > 0.0 {
        ring.iter().rev().copied().collect()
    } else {
        ring.to_vec()
    }
}

/// Length of the closed ring, including the closing edge.
#[must_use]
pub fn ring_length(ring: &[Point2]) -> f64 {
    let n = ring.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| super::distance(&ring[i], &ring[(i + 1) % n]))
        .sum()
}

/// Area centroid of a ring. Falls back to the vertex average for
/// zero-area rings.
#[must_use]
pub fn ring_centroid(ring: &[Point2]) -> Point2 {
    let n = ring.len();
    if n == 0 {
        return Point2::origin();
    }
    let area = signed_area(ring);
    if area.abs() < TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Point2::new(sx * inv, sy * inv);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    let k = 1.0 / (6.0 * area);
    Point2::new(cx * k, cy * k)
}

/// Classifies a point against a ring using an even-odd ray cast, with an
/// explicit boundary check first.
#[must_use]
pub fn point_in_ring(p: &Point2, ring: &[Point2]) -> Containment {
    let n = ring.len();
    if n < 3 {
        return Containment::Outside;
    }
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if point_to_segment_dist(p.x, p.y, a.x, a.y, b.x, b.y) < super::POINT_EPS {
            return Containment::Boundary;
        }
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    if inside {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// Winding number of a closed ring around `p`; positive for
/// counter-clockwise turns.
#[must_use]
pub fn winding_number(p: &Point2, ring: &[Point2]) -> i32 {
    let n = ring.len();
    let mut winding = 0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Returns `true` if every point lies on a single line (exact cross-product
/// test against the first two points, tolerance `1e-6`).
#[must_use]
pub fn all_collinear(points: &[Point2]) -> bool {
    if points.len() < 3 {
        return true;
    }
    let p0 = points[0];
    let p1 = points[1];
    points[2..].iter().all(|p2| {
        let cross = (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x);
        cross.abs() <= 1e-6
    })
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area(&unit_square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let cw: Vec<_> = unit_square().into_iter().rev().collect();
        assert!((signed_area(&cw) + 1.0).abs() < TOLERANCE);
        assert!(is_ccw(&ensure_ccw(&cw)));
    }

    #[test]
    fn winding_follows_orientation() {
        let p = Point2::new(0.5, 0.5);
        assert_eq!(winding_number(&p, &unit_square()), 1);
        let cw: Vec<_> = unit_square().into_iter().rev().collect();
        assert_eq!(winding_number(&p, &cw), -1);
        assert_eq!(winding_number(&Point2::new(2.0, 0.5), &unit_square()), 0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_rectangle() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4000.0, 0.0),
            Point2::new(4000.0, 2000.0),
            Point2::new(0.0, 2000.0),
        ];
        let c = ring_centroid(&ring);
        assert!((c.x - 2000.0).abs() < 1e-6);
        assert!((c.y - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn point_in_ring_classification() {
        let sq = unit_square();
        assert_eq!(point_in_ring(&Point2::new(0.5, 0.5), &sq), Containment::Inside);
        assert_eq!(point_in_ring(&Point2::new(1.0, 0.5), &sq), Containment::Boundary);
        assert_eq!(point_in_ring(&Point2::new(1.5, 0.5), &sq), Containment::Outside);
    }

    #[test]
    fn collinear_detection() {
        let line = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(2000.0, 0.0),
        ];
        assert!(all_collinear(&line));
        assert!(!all_collinear(&unit_square()));
    }

    #[test]
    fn ring_length_square() {
        assert!((ring_length(&unit_square()) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn left_normal_basic() {
        let n = left_normal(Vector2::new(1.0, 0.0));
        assert!(n.x.abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }
}
