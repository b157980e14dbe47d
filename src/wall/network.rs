use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Bounds, LineSegment, MultiPolygon, Polygon};
use crate::kernel;
use crate::math::polygon_2d::ensure_ccw;
use crate::math::{distance, Point2};
use crate::validation::{auto_close_wall_chain, GeometryIssue};

use super::corner::WallCorner;
use super::junction::{find_crossings, find_t_junctions, Junctions};
use super::offset::OffsetWall;
use super::segment::WallSegment;

/// Default gap (mm) closed between walls as floating-point noise.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1.0;

/// T-junction search radius as a multiple of the snap tolerance.
const T_JUNCTION_FACTOR: f64 = 5.0;

/// All walls of one floor. The network is the only place wall endpoints
/// are rewritten.
#[derive(Debug, Clone)]
pub struct WallNetwork {
    segments: Vec<WallSegment>,
    snap_tolerance: f64,
}

impl Default for WallNetwork {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_TOLERANCE)
    }
}

impl WallNetwork {
    #[must_use]
    pub fn new(snap_tolerance: f64) -> Self {
        Self {
            segments: Vec::new(),
            snap_tolerance,
        }
    }

    /// Creates and appends a wall.
    ///
    /// # Errors
    ///
    /// Propagates the construction errors of [`WallSegment::new`].
    pub fn add(&mut self, start: Point2, end: Point2, thickness: f64) -> Result<&WallSegment> {
        let segment = WallSegment::new(start, end, thickness)?;
        Ok(self.push(segment))
    }

    /// Appends an already constructed wall.
    pub fn push(&mut self, segment: WallSegment) -> &WallSegment {
        self.segments.push(segment);
        let last = self.segments.len() - 1;
        &self.segments[last]
    }

    #[must_use]
    pub fn segments(&self) -> &[WallSegment] {
        &self.segments
    }

    #[must_use]
    pub fn snap_tolerance(&self) -> f64 {
        self.snap_tolerance
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Diagnostics for every wall, each message prefixed with its index.
    #[must_use]
    pub fn validate_all(&self, max_thickness: f64) -> Vec<GeometryIssue> {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(i, s)| {
                s.issues(max_thickness)
                    .into_iter()
                    .map(move |issue| issue.prefixed(&format!("wall {i}")))
            })
            .collect()
    }

    /// Treats the walls as one ordered chain and closes it if the last end
    /// falls near the first start.
    ///
    /// Needs at least three walls. A closing wall inherits the last wall's
    /// thickness.
    pub fn auto_close(&mut self, tolerance: f64) -> Vec<GeometryIssue> {
        if self.segments.len() < 3 {
            return Vec::new();
        }
        let chain: Vec<LineSegment> = self.segments.iter().map(WallSegment::centerline).collect();
        let (fixed, issues) = auto_close_wall_chain(&chain, tolerance);

        for (segment, line) in self.segments.iter_mut().zip(&fixed) {
            segment.set_endpoints(line.start, line.end);
        }
        if let Some(closing) = fixed.get(chain.len()) {
            let thickness = self.segments[chain.len() - 1].thickness();
            match WallSegment::new(closing.start, closing.end, thickness) {
                Ok(wall) => {
                    self.segments.push(wall);
                }
                Err(e) => warn!(error = %e, "could not add closing wall"),
            }
        }
        issues
    }

    #[must_use]
    pub fn offset_walls(&self) -> Vec<OffsetWall> {
        self.segments.iter().map(WallSegment::to_offset_wall).collect()
    }

    /// T-junctions and crossings across the network.
    #[must_use]
    pub fn find_junctions(&self) -> Junctions {
        let walls = self.offset_walls();
        Junctions {
            t_junctions: find_t_junctions(&walls, self.snap_tolerance * T_JUNCTION_FACTOR),
            crossings: find_crossings(&walls),
        }
    }

    /// Unions every wall body in one pass, then closes sub-tolerance gaps.
    #[must_use]
    pub fn merge_walls(&self) -> MultiPolygon {
        if self.segments.is_empty() {
            return MultiPolygon::empty();
        }
        let bodies: Vec<Polygon> = self.segments.iter().map(WallSegment::to_polygon).collect();
        let merged = kernel::union_all(&bodies);
        let merged = kernel::close_gaps(&merged, self.snap_tolerance);
        debug!(
            walls = self.segments.len(),
            polygons = merged.len(),
            "merged wall mass"
        );
        merged
    }

    /// Merges walls corner by corner.
    ///
    /// Wall ends sharing a node with exactly one other wall end are
    /// resolved as a [`WallCorner`]; the corner fills are unioned with all
    /// wall bodies, then gaps are closed as in [`WallNetwork::merge_walls`].
    #[must_use]
    pub fn merge_walls_advanced(&self) -> MultiPolygon {
        if self.segments.is_empty() {
            return MultiPolygon::empty();
        }
        let walls = self.offset_walls();
        let mut pieces: Vec<Polygon> = walls.iter().filter_map(OffsetWall::polygon).collect();

        let nodes = self.end_nodes();
        let mut corners = 0_usize;
        for node in &nodes {
            let [first, second] = node.ends.as_slice() else {
                continue;
            };
            // Orient so wall A ends at the node and wall B starts there.
            let a = if first.at_end {
                walls[first.wall].clone()
            } else {
                walls[first.wall].reversed()
            };
            let b = if second.at_end {
                walls[second.wall].reversed()
            } else {
                walls[second.wall].clone()
            };
            pieces.extend(WallCorner::new(a, b, node.point).resolve().into_inner());
            corners += 1;
        }

        let merged = kernel::union_all(&pieces);
        let merged = kernel::close_gaps(&merged, self.snap_tolerance);
        debug!(
            walls = self.segments.len(),
            corners,
            polygons = merged.len(),
            "merged wall mass corner by corner"
        );
        merged
    }

    /// Rooms enclosed by the fast-merged mass.
    #[must_use]
    pub fn detect_rooms(&self) -> Vec<Polygon> {
        let rooms = rooms_in(&self.merge_walls());
        debug!(rooms = rooms.len(), "detected rooms");
        rooms
    }

    /// Bounds of the merged mass; all zeros for an empty network.
    #[must_use]
    pub fn bounding_box(&self) -> Bounds {
        self.merge_walls().bounds()
    }

    /// Groups wall ends into nodes by snap distance.
    fn end_nodes(&self) -> Vec<EndNode> {
        let mut nodes: Vec<EndNode> = Vec::new();
        for (wall, segment) in self.segments.iter().enumerate() {
            for (point, at_end) in [(segment.start(), false), (segment.end(), true)] {
                let end = WallEnd { wall, at_end };
                match nodes
                    .iter_mut()
                    .find(|n| distance(&n.point, &point) <= self.snap_tolerance)
                {
                    Some(node) => node.ends.push(end),
                    None => nodes.push(EndNode {
                        point,
                        ends: vec![end],
                    }),
                }
            }
        }
        nodes
    }
}

#[derive(Debug, Clone, Copy)]
struct WallEnd {
    wall: usize,
    at_end: bool,
}

#[derive(Debug)]
struct EndNode {
    point: Point2,
    ends: Vec<WallEnd>,
}

/// Every hole of every polygon in `mass`, as counter-clockwise polygons.
#[must_use]
pub fn rooms_in(mass: &MultiPolygon) -> Vec<Polygon> {
    mass.interiors()
        .map(|ring| Polygon::from_parts(ensure_ccw(ring), Vec::new()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::IssueCode;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn rectangle() -> WallNetwork {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 0.0), p(5000.0, 0.0), 200.0).unwrap();
        net.add(p(5000.0, 0.0), p(5000.0, 4000.0), 200.0).unwrap();
        net.add(p(5000.0, 4000.0), p(0.0, 4000.0), 200.0).unwrap();
        net.add(p(0.0, 4000.0), p(0.0, 0.0), 200.0).unwrap();
        net
    }

    #[test]
    fn closed_rectangle_has_one_room() {
        let rooms = rectangle().detect_rooms();
        assert_eq!(rooms.len(), 1);
        let area = rooms[0].area();
        assert!(area < 5000.0 * 4000.0);
        assert!(area > 4000.0 * 3000.0);
        assert_abs_diff_eq!(area, 4800.0 * 3800.0, epsilon = 100.0);
        assert!(rooms[0].is_ccw());
    }

    #[test]
    fn partition_adds_a_room() {
        let mut net = rectangle();
        net.add(p(3000.0, 0.0), p(3000.0, 4000.0), 150.0).unwrap();
        assert_eq!(net.detect_rooms().len(), 2);
    }

    #[test]
    fn open_chain_has_no_rooms() {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 0.0), p(5000.0, 0.0), 200.0).unwrap();
        net.add(p(5000.0, 0.0), p(5000.0, 4000.0), 200.0).unwrap();
        net.add(p(5000.0, 4000.0), p(0.0, 4000.0), 200.0).unwrap();
        assert!(net.detect_rooms().is_empty());
    }

    #[test]
    fn empty_network() {
        let net = WallNetwork::default();
        assert!(net.merge_walls().is_empty());
        assert!(net.detect_rooms().is_empty());
        assert_eq!(net.bounding_box(), Bounds::ZERO);
    }

    #[test]
    fn bounding_box_includes_thickness() {
        let b = rectangle().bounding_box();
        assert_abs_diff_eq!(b.min_x, -100.0, epsilon = 0.1);
        assert_abs_diff_eq!(b.max_y, 4100.0, epsilon = 0.1);
    }

    #[test]
    fn fast_and_advanced_merge_agree() {
        let mut net = rectangle();
        net.add(p(3000.0, 0.0), p(3000.0, 4000.0), 150.0).unwrap();
        let fast = net.merge_walls();
        let advanced = net.merge_walls_advanced();
        let fast_rooms = rooms_in(&fast);
        let advanced_rooms = rooms_in(&advanced);
        assert_eq!(fast_rooms.len(), advanced_rooms.len());
        let fast_area: f64 = fast_rooms.iter().map(Polygon::area).sum();
        let advanced_area: f64 = advanced_rooms.iter().map(Polygon::area).sum();
        assert!((fast_area - advanced_area).abs() / fast_area < 1e-3);
        // Corner fills only add the four outer notches.
        assert!((fast.area() - advanced.area()).abs() / fast.area() < 0.02);
    }

    #[test]
    fn advanced_merge_fills_outer_corners() {
        let advanced = rectangle().merge_walls_advanced();
        assert_eq!(advanced.len(), 1);
        assert!(advanced.polygons()[0].covers_point(&p(-95.0, -95.0)));
        assert!(!rectangle().merge_walls().polygons()[0].covers_point(&p(-95.0, -95.0)));
    }

    #[test]
    fn auto_close_snaps_small_gap() {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 0.0), p(5000.0, 0.0), 200.0).unwrap();
        net.add(p(5000.0, 0.0), p(5000.0, 4000.0), 200.0).unwrap();
        net.add(p(5000.0, 4000.0), p(0.0, 4000.0), 200.0).unwrap();
        net.add(p(0.0, 4000.0), p(0.0, 3.0), 200.0).unwrap();
        let issues = net.auto_close(5.0);
        assert_eq!(issues[0].code, IssueCode::ChainSnapped);
        assert_eq!(net.len(), 4);
        assert_eq!(net.segments()[3].end(), p(0.0, 0.0));
    }

    #[test]
    fn auto_close_adds_closing_wall() {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 0.0), p(5000.0, 0.0), 200.0).unwrap();
        net.add(p(5000.0, 0.0), p(5000.0, 4000.0), 200.0).unwrap();
        net.add(p(5000.0, 4000.0), p(0.0, 4000.0), 150.0).unwrap();
        let issues = net.auto_close(5.0);
        assert_eq!(issues[0].code, IssueCode::ChainAutoClosed);
        assert_eq!(net.len(), 4);
        assert_abs_diff_eq!(net.segments()[3].thickness(), 150.0);
        assert_eq!(net.detect_rooms().len(), 1);
    }

    #[test]
    fn auto_close_needs_three_walls() {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 0.0), p(5000.0, 0.0), 200.0).unwrap();
        net.add(p(5000.0, 0.0), p(5000.0, 4000.0), 200.0).unwrap();
        assert!(net.auto_close(5.0).is_empty());
        assert_eq!(net.len(), 2);
    }

    #[test]
    fn crossing_walls_are_reported() {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 500.0), p(1000.0, 500.0), 100.0).unwrap();
        net.add(p(500.0, 0.0), p(500.0, 1000.0), 100.0).unwrap();
        let junctions = net.find_junctions();
        assert_eq!(junctions.crossings.len(), 1);
        assert!(junctions.t_junctions.is_empty());
    }

    #[test]
    fn validate_all_prefixes_wall_index() {
        let mut net = WallNetwork::default();
        net.add(p(0.0, 0.0), p(1000.0, 0.0), 200.0).unwrap();
        net.add(p(0.0, 0.0), p(0.0, 1000.0), 1500.0).unwrap();
        let issues = net.validate_all(1000.0);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("wall 1: "));
    }
}
