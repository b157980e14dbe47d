use serde::Serialize;

use crate::math::distance_2d::point_segment_distance;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{distance, Point2};

use super::offset::OffsetWall;

/// Intersections closer than this (mm) to a wall end are L/T contacts, not
/// crossings.
const CROSSING_ENDPOINT_CLEARANCE: f64 = 1.0;

/// A wall end that stops on the body of another wall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TJunction {
    pub wall_index: usize,
    pub target_wall_index: usize,
    pub point: [f64; 2],
    /// Distance from the endpoint to the target centerline.
    pub snap_distance: f64,
}

/// Two centerlines crossing at a point interior to both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crossing {
    pub wall_a: usize,
    pub wall_b: usize,
    pub point: [f64; 2],
}

/// Junction report for a whole wall set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Junctions {
    pub t_junctions: Vec<TJunction>,
    pub crossings: Vec<Crossing>,
}

/// Finds wall ends lying within `tolerance` of another wall's centerline
/// but not within `tolerance` of either of its ends.
#[must_use]
pub fn find_t_junctions(walls: &[OffsetWall], tolerance: f64) -> Vec<TJunction> {
    let mut found = Vec::new();
    for (i, wall) in walls.iter().enumerate() {
        let line = wall.centerline();
        for endpoint in [line.start, line.end] {
            for (j, target) in walls.iter().enumerate() {
                if i == j {
                    continue;
                }
                let t = target.centerline();
                let dist = point_segment_distance(&endpoint, &t.start, &t.end);
                if dist > tolerance {
                    continue;
                }
                if distance(&endpoint, &t.start) < tolerance
                    || distance(&endpoint, &t.end) < tolerance
                {
                    continue;
                }
                found.push(TJunction {
                    wall_index: i,
                    target_wall_index: j,
                    point: [endpoint.x, endpoint.y],
                    snap_distance: dist,
                });
            }
        }
    }
    found
}

/// Finds every pair of centerlines that cross away from their ends.
#[must_use]
pub fn find_crossings(walls: &[OffsetWall]) -> Vec<Crossing> {
    let mut found = Vec::new();
    for i in 0..walls.len() {
        let a = walls[i].centerline();
        for (j, other) in walls.iter().enumerate().skip(i + 1) {
            let b = other.centerline();
            let Some((p, _, _)) = segment_segment_intersect_2d(&a.start, &a.end, &b.start, &b.end)
            else {
                continue;
            };
            let near_end = |q: &Point2| distance(&p, q) < CROSSING_ENDPOINT_CLEARANCE;
            if [a.start, a.end, b.start, b.end].iter().any(near_end) {
                continue;
            }
            found.push(Crossing {
                wall_a: i,
                wall_b: j,
                point: [p.x, p.y],
            });
        }
    }
    found
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::LineSegment;
    use approx::assert_abs_diff_eq;

    fn wall(a: (f64, f64), b: (f64, f64)) -> OffsetWall {
        OffsetWall::new(
            LineSegment::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1)),
            200.0,
        )
    }

    #[test]
    fn single_crossing_at_center() {
        let walls = [
            wall((0.0, 500.0), (1000.0, 500.0)),
            wall((500.0, 0.0), (500.0, 1000.0)),
        ];
        let crossings = find_crossings(&walls);
        assert_eq!(crossings.len(), 1);
        assert_abs_diff_eq!(crossings[0].point[0], 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(crossings[0].point[1], 500.0, epsilon = 1e-9);
        assert_eq!((crossings[0].wall_a, crossings[0].wall_b), (0, 1));
    }

    #[test]
    fn l_corner_is_not_a_crossing() {
        let walls = [
            wall((0.0, 0.0), (1000.0, 0.0)),
            wall((1000.0, 0.0), (1000.0, 1000.0)),
        ];
        assert!(find_crossings(&walls).is_empty());
        assert!(find_t_junctions(&walls, 5.0).is_empty());
    }

    #[test]
    fn partition_meeting_a_wall_body_is_a_t() {
        let walls = [
            wall((0.0, 0.0), (5000.0, 0.0)),
            wall((3000.0, 0.0), (3000.0, 4000.0)),
        ];
        let ts = find_t_junctions(&walls, 5.0);
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].wall_index, 1);
        assert_eq!(ts[0].target_wall_index, 0);
        assert_eq!(ts[0].point, [3000.0, 0.0]);
        assert_abs_diff_eq!(ts[0].snap_distance, 0.0);
        // Touching at an endpoint is not a crossing either.
        assert!(find_crossings(&walls).is_empty());
    }

    #[test]
    fn near_miss_within_tolerance_is_a_t() {
        let walls = [
            wall((0.0, 0.0), (5000.0, 0.0)),
            wall((2000.0, 3.0), (2000.0, 3000.0)),
        ];
        let ts = find_t_junctions(&walls, 5.0);
        assert_eq!(ts.len(), 1);
        assert_abs_diff_eq!(ts[0].snap_distance, 3.0, epsilon = 1e-9);
    }
}
