use crate::geometry::{LineSegment, MultiPolygon};
use crate::kernel::{self, JoinStyle};
use crate::math::intersect_2d::{line_line_intersect_2d, segment_segment_intersect_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::offset::{OffsetWall, MITRE_LIMIT};

/// Corners sharper than this (degrees) are clamped.
pub const ACUTE_ANGLE_DEG: f64 = 60.0;

/// Clamp radius as a multiple of the thicker wall.
pub const ACUTE_CLAMP_FACTOR: f64 = 3.0;

/// How far offset lines are extended when searching for a mitre point (mm).
const MITRE_SEARCH_EXTENSION: f64 = 1000.0;

/// Segments used for round joins.
const ROUND_JOIN_SEGMENTS: usize = 8;

/// Two walls meeting at a junction: `wall_a` ends there and `wall_b`
/// starts there.
#[derive(Debug, Clone)]
pub struct WallCorner {
    pub wall_a: OffsetWall,
    pub wall_b: OffsetWall,
    pub junction: Point2,
}

impl WallCorner {
    #[must_use]
    pub fn new(wall_a: OffsetWall, wall_b: OffsetWall, junction: Point2) -> Self {
        Self {
            wall_a,
            wall_b,
            junction,
        }
    }

    /// Angle between the direction of `wall_a` at its end and of `wall_b`
    /// at its start, in degrees within `[0, 180]`.
    #[must_use]
    pub fn angle_degrees(&self) -> f64 {
        let da = self.wall_a.centerline().direction();
        let db = self.wall_b.centerline().direction();
        let dot = da.dot(&db);
        let cross = da.x * db.y - da.y * db.x;
        cross.abs().atan2(dot).to_degrees()
    }

    #[must_use]
    pub fn is_acute(&self) -> bool {
        self.angle_degrees() < ACUTE_ANGLE_DEG
    }

    /// Merges both wall bodies and fills the outside of the corner
    /// according to `wall_a`'s join style.
    ///
    /// Acute corners are clipped to a disc around the junction so the join
    /// cannot grow an unbounded spike.
    #[must_use]
    pub fn resolve(&self) -> MultiPolygon {
        let mut rings: Vec<Vec<Point2>> = [&self.wall_a, &self.wall_b]
            .into_iter()
            .filter_map(OffsetWall::polygon)
            .map(|p| p.exterior().to_vec())
            .collect();
        if let Some(fill) = self.join_fill() {
            rings.push(fill);
        }
        let merged = kernel::union_rings(&rings);

        if self.is_acute() {
            let radius =
                self.wall_a.thickness().max(self.wall_b.thickness()) * ACUTE_CLAMP_FACTOR;
            let clip = MultiPolygon::from(kernel::disc(&self.junction, radius));
            return kernel::intersection(&merged, &clip);
        }
        merged
    }

    /// The wedge closing the notch between the two flat wall ends on the
    /// convex side of the corner.
    fn join_fill(&self) -> Option<Vec<Point2>> {
        let da = self.wall_a.centerline().direction();
        let db = self.wall_b.centerline().direction();
        let cross = da.x * db.y - da.y * db.x;
        if cross.abs() < TOLERANCE {
            return None;
        }
        // A left turn opens its notch on the right and vice versa.
        let side = if cross > 0.0 { -1.0 } else { 1.0 };
        let ha = self.wall_a.half_thickness() * side;
        let hb = self.wall_b.half_thickness() * side;
        let j = self.junction;
        let pa = j + left(da) * ha;
        let pb = j + left(db) * hb;

        let bevel = vec![j, pa, pb];
        match self.wall_a.join() {
            JoinStyle::Bevel => Some(bevel),
            JoinStyle::Mitre => {
                let limit = MITRE_LIMIT * ha.abs().max(hb.abs());
                let mitre = line_line_intersect_2d(&pa, &da, &pb, &db)
                    .map(|(t, _)| pa + da * t)
                    .filter(|m| (m - j).norm() <= limit);
                Some(mitre.map_or(bevel, |m| vec![j, pa, m, pb]))
            }
            JoinStyle::Round => {
                let radius = ha.abs().max(hb.abs());
                let a0 = (pa - j).y.atan2((pa - j).x);
                let a1 = (pb - j).y.atan2((pb - j).x);
                let mut sweep = a1 - a0;
                if sweep > std::f64::consts::PI {
                    sweep -= std::f64::consts::TAU;
                } else if sweep < -std::f64::consts::PI {
                    sweep += std::f64::consts::TAU;
                }
                let mut fan = vec![j];
                fan.extend(kernel::arc_points(&j, radius, a0, sweep, ROUND_JOIN_SEGMENTS));
                Some(fan)
            }
        }
    }
}

fn left(d: Vector2) -> Vector2 {
    Vector2::new(-d.y, d.x)
}

/// Where two centerlines' parallel offsets meet.
///
/// Both lines are offset by the same signed distance (positive = left),
/// extended by a metre past each end and intersected. Parallel offsets
/// yield `None`.
#[must_use]
pub fn compute_mitre_point(
    line_a: &LineSegment,
    line_b: &LineSegment,
    offset: f64,
) -> Option<Point2> {
    let a = line_a.offset(offset).extended(MITRE_SEARCH_EXTENSION);
    let b = line_b.offset(offset).extended(MITRE_SEARCH_EXTENSION);
    segment_segment_intersect_2d(&a.start, &a.end, &b.start, &b.end).map(|(p, _, _)| p)
}
