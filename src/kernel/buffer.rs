use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::geometry::{MultiPolygon, Polygon};
use crate::math::distance_2d::point_to_ring_dist;
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::{ensure_ccw, point_in_ring, Containment};
use crate::math::{points_equal, Point2, Vector2, TOLERANCE};

use super::overlay::{difference, intersection, positive_fill, union_all};

/// Vertices used to approximate a full circle.
const DISC_SEGMENTS: usize = 64;

/// Vertices used for the small round caps of dilation and erosion.
const CAP_SEGMENTS: usize = 16;

/// Relative shortfall from the offset distance still accepted when checking
/// the clearance of an inward offset.
const CLEARANCE_SLACK: f64 = 1e-9;

/// How two offset edges are joined at a corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStyle {
    /// Extend both edges to a sharp point.
    #[default]
    Mitre,
    /// Cut the corner with a straight chord.
    Bevel,
    /// Fill the corner with a circular arc.
    Round,
}

/// How the ends of a buffered segment are finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapStyle {
    /// Stop exactly at the endpoint.
    #[default]
    Flat,
    /// Extend past the endpoint by the half-width.
    Square,
    /// Semicircle around the endpoint.
    Round,
}

/// Regular polygon approximating a circle, counter-clockwise.
fn circle_ring(center: &Point2, radius: f64, segments: usize) -> Vec<Point2> {
    (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let a = TAU * i as f64 / segments as f64;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Points on an arc from `start_angle` sweeping `sweep` radians, both ends
/// included.
pub(crate) fn arc_points(
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    segments: usize,
) -> Vec<Point2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let a = start_angle + sweep * i as f64 / segments as f64;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// A circular polygon of the given radius.
#[must_use]
pub fn disc(center: &Point2, radius: f64) -> Polygon {
    Polygon::from_parts(circle_ring(center, radius.abs(), DISC_SEGMENTS), Vec::new())
}

/// Buffers the segment `start`-`end` by `half_width` on both sides.
///
/// Returns `None` for a zero-length segment unless the cap is round, in
/// which case the result is a disc.
#[must_use]
pub fn buffer_segment(
    start: &Point2,
    end: &Point2,
    half_width: f64,
    cap: CapStyle,
) -> Option<Polygon> {
    let half_width = half_width.abs();
    if half_width < TOLERANCE {
        return None;
    }
    let d = end - start;
    let len = d.norm();
    if len < TOLERANCE {
        return (cap == CapStyle::Round).then(|| disc(start, half_width));
    }
    let dir = d / len;
    let n = Vector2::new(-dir.y, dir.x) * half_width;

    let ring = match cap {
        CapStyle::Flat => vec![start - n, end - n, end + n, start + n],
        CapStyle::Square => {
            let ext = dir * half_width;
            vec![
                start - ext - n,
                end + ext - n,
                end + ext + n,
                start - ext + n,
            ]
        }
        CapStyle::Round => {
            let base = dir.y.atan2(dir.x);
            let half = CAP_SEGMENTS / 2;
            let mut ring = arc_points(end, half_width, base - PI / 2.0, PI, half);
            ring.extend(arc_points(start, half_width, base + PI / 2.0, PI, half));
            ring
        }
    };
    Some(Polygon::from_parts(ring, Vec::new()))
}

/// Bands along every boundary edge plus caps at every boundary vertex:
/// the region within `radius` of the boundary of `mass`.
fn boundary_zone(mass: &MultiPolygon, radius: f64) -> Vec<Polygon> {
    let mut pieces = Vec::new();
    for polygon in mass {
        let holes = polygon.interiors().iter().map(Vec::as_slice);
        for ring in std::iter::once(polygon.exterior()).chain(holes) {
            let n = ring.len();
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                if let Some(band) = buffer_segment(&a, &b, radius, CapStyle::Flat) {
                    pieces.push(band);
                }
                pieces.push(Polygon::from_parts(
                    circle_ring(&a, radius, CAP_SEGMENTS),
                    Vec::new(),
                ));
            }
        }
    }
    pieces
}

/// Grows the mass by `radius` with rounded corners.
#[must_use]
pub fn dilate(mass: &MultiPolygon, radius: f64) -> MultiPolygon {
    if radius <= 0.0 || mass.is_empty() {
        return mass.clone();
    }
    let zone = boundary_zone(mass, radius);
    union_all(mass.iter().chain(zone.iter()))
}

/// Shrinks the mass by `radius`, keeping only points at least `radius` from
/// its boundary.
#[must_use]
pub fn erode(mass: &MultiPolygon, radius: f64) -> MultiPolygon {
    if radius <= 0.0 || mass.is_empty() {
        return mass.clone();
    }
    let zone = union_all(&boundary_zone(mass, radius));
    difference(mass, &zone)
}

/// Closes gaps narrower than `2 * radius` by dilating then eroding.
#[must_use]
pub fn close_gaps(mass: &MultiPolygon, radius: f64) -> MultiPolygon {
    erode(&dilate(mass, radius), radius)
}

/// Offsets a closed ring with mitre joins.
///
/// Positive `distance` grows the enclosed region, negative shrinks it.
/// Corners whose mitre point would lie further than `mitre_limit * |distance|`
/// from the vertex are bevelled. An inward offset that consumes the whole
/// ring yields an empty result.
#[must_use]
pub fn offset_ring(ring: &[Point2], distance: f64, mitre_limit: f64) -> MultiPolygon {
    let mut ring = ensure_ccw(ring);
    ring.dedup_by(|a, b| points_equal(a, b));
    if ring.len() > 1 && points_equal(&ring[0], &ring[ring.len() - 1]) {
        ring.pop();
    }
    if ring.len() < 3 {
        return MultiPolygon::empty();
    }
    let original = Polygon::from_parts(ring.clone(), Vec::new());
    if distance.abs() < TOLERANCE {
        return original.into();
    }

    let n = ring.len();
    let edge = |i: usize| {
        let a = ring[i % n];
        let b = ring[(i + 1) % n];
        let dir = (b - a).normalize();
        // Outward normal of a counter-clockwise edge.
        (a, dir, Vector2::new(dir.y, -dir.x))
    };

    let limit = mitre_limit * distance.abs();
    let mut raw = Vec::with_capacity(n * 2);
    for i in 0..n {
        let (a0, d0, n0) = edge(i + n - 1);
        let (a1, d1, n1) = edge(i);
        let vertex = ring[i];
        let p0 = a0 + n0 * distance;
        let p1 = a1 + n1 * distance;
        match line_line_intersect_2d(&p0, &d0, &p1, &d1) {
            Some((t, _)) => {
                let mitre = p0 + d0 * t;
                if (mitre - vertex).norm() > limit {
                    raw.push(vertex + n0 * distance);
                    raw.push(vertex + n1 * distance);
                } else {
                    raw.push(mitre);
                }
            }
            None => raw.push(vertex + n1 * distance),
        }
    }

    let filled = positive_fill(&raw);
    if distance > 0.0 {
        return filled;
    }

    // Inward: every point of the true offset region lies at least |distance|
    // from the original boundary. Loops left over from edges that passed
    // through each other are closer than that and are dropped.
    let min_clearance = distance.abs() * (1.0 - CLEARANCE_SLACK);
    let kept: Vec<Polygon> = filled
        .into_inner()
        .into_iter()
        .filter(|piece| {
            let probe = piece.representative_point();
            point_in_ring(&probe, &ring) == Containment::Inside
                && point_to_ring_dist(&probe, &ring) >= min_clearance
        })
        .collect();
    if kept.is_empty() {
        return MultiPolygon::empty();
    }
    intersection(&MultiPolygon::new(kept), &original.into())
}

/// Offsets a polygon with holes; holes move opposite to the exterior.
#[must_use]
pub fn offset_polygon(polygon: &Polygon, distance: f64, mitre_limit: f64) -> MultiPolygon {
    let outer = offset_ring(polygon.exterior(), distance, mitre_limit);
    if polygon.interiors().is_empty() || outer.is_empty() {
        return outer;
    }
    let holes: Vec<Polygon> = polygon
        .interiors()
        .iter()
        .flat_map(|h| offset_ring(h, -distance, mitre_limit).into_inner())
        .collect();
    difference(&outer, &union_all(&holes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_ring(size: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn flat_buffer_is_rectangle() {
        let p = buffer_segment(
            &Point2::new(0.0, 0.0),
            &Point2::new(1000.0, 0.0),
            100.0,
            CapStyle::Flat,
        )
        .unwrap();
        assert_abs_diff_eq!(p.area(), 200_000.0, epsilon = 1e-6);
        let b = p.bounds();
        assert_abs_diff_eq!(b.min_x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.max_y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn square_cap_extends_length() {
        let p = buffer_segment(
            &Point2::new(0.0, 0.0),
            &Point2::new(1000.0, 0.0),
            100.0,
            CapStyle::Square,
        )
        .unwrap();
        assert_abs_diff_eq!(p.bounds().width(), 1200.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_length_flat_buffer_is_none() {
        let p = Point2::new(5.0, 5.0);
        assert!(buffer_segment(&p, &p, 100.0, CapStyle::Flat).is_none());
        assert!(buffer_segment(&p, &p, 100.0, CapStyle::Round).is_some());
    }

    #[test]
    fn inward_offset_of_square() {
        let out = offset_ring(&square_ring(1000.0), -100.0, 2.0);
        assert_eq!(out.len(), 1);
        let b = out.bounds();
        assert_abs_diff_eq!(b.min_x, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.max_y, 900.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out.area(), 640_000.0, epsilon = 1e-3);
    }

    #[test]
    fn inward_offset_past_the_centre_is_empty() {
        for distance in [-501.0, -600.0, -900.0, -2000.0] {
            let out = offset_ring(&square_ring(1000.0), distance, 2.0);
            assert!(out.is_empty(), "offset {distance} left area {}", out.area());
        }
    }

    #[test]
    fn inward_offset_just_short_of_the_centre_survives() {
        let out = offset_ring(&square_ring(1000.0), -490.0, 2.0);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out.area(), 20.0 * 20.0, epsilon = 1e-6);
    }

    #[test]
    fn outward_offset_of_square_keeps_mitre_corners() {
        let out = offset_ring(&square_ring(1000.0), 100.0, 2.0);
        assert_abs_diff_eq!(out.area(), 1_440_000.0, epsilon = 1e-3);
    }

    #[test]
    fn inward_offset_collapses() {
        let thin = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(1000.0, 100.0),
            Point2::new(0.0, 100.0),
        ];
        assert!(offset_ring(&thin, -60.0, 2.0).is_empty());
    }

    #[test]
    fn close_gaps_bridges_hairline_gap() {
        let a = Polygon::rect(0.0, 0.0, 1000.0, 200.0);
        let b = Polygon::rect(1000.5, 0.0, 2000.0, 200.0);
        let mass = union_all([&a, &b]);
        assert_eq!(mass.len(), 2);
        let closed = close_gaps(&mass, 1.0);
        assert_eq!(closed.len(), 1);
        assert_abs_diff_eq!(closed.area(), 2000.0 * 200.0, epsilon = 5.0);
    }

    #[test]
    fn close_gaps_preserves_rectangle() {
        let mass = MultiPolygon::from(Polygon::rect(0.0, 0.0, 1000.0, 500.0));
        let closed = close_gaps(&mass, 1.0);
        assert_eq!(closed.len(), 1);
        let b = closed.bounds();
        assert_abs_diff_eq!(b.min_x, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(b.max_x, 1000.0, epsilon = 0.05);
        assert_abs_diff_eq!(closed.area(), 500_000.0, epsilon = 2.0);
    }

    #[test]
    fn disc_area_approaches_circle() {
        let d = disc(&Point2::origin(), 100.0);
        assert!((d.area() - PI * 10_000.0).abs() / (PI * 10_000.0) < 0.01);
    }
}
