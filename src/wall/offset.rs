use crate::geometry::{LineSegment, Polygon};
use crate::kernel::{buffer_segment, CapStyle, JoinStyle};

/// Longest mitre, as a multiple of the half-thickness, before a corner is
/// bevelled.
pub const MITRE_LIMIT: f64 = 5.0;

/// A wall centerline with a thickness and join/cap policy.
///
/// Edges follow the signed-offset convention: positive offsets lie left of
/// the walking direction. The right side faces the room.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetWall {
    centerline: LineSegment,
    thickness: f64,
    join: JoinStyle,
    cap: CapStyle,
}

impl OffsetWall {
    /// Mitre joins and flat caps.
    #[must_use]
    pub fn new(centerline: LineSegment, thickness: f64) -> Self {
        Self {
            centerline,
            thickness,
            join: JoinStyle::Mitre,
            cap: CapStyle::Flat,
        }
    }

    #[must_use]
    pub fn with_join(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    #[must_use]
    pub fn with_cap(mut self, cap: CapStyle) -> Self {
        self.cap = cap;
        self
    }

    #[must_use]
    pub fn centerline(&self) -> &LineSegment {
        &self.centerline
    }

    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[must_use]
    pub fn half_thickness(&self) -> f64 {
        self.thickness * 0.5
    }

    #[must_use]
    pub fn join(&self) -> JoinStyle {
        self.join
    }

    #[must_use]
    pub fn cap(&self) -> CapStyle {
        self.cap
    }

    /// The buffered wall body, or `None` for a zero-length flat or square
    /// capped wall.
    #[must_use]
    pub fn polygon(&self) -> Option<Polygon> {
        buffer_segment(
            &self.centerline.start,
            &self.centerline.end,
            self.half_thickness(),
            self.cap,
        )
    }

    #[must_use]
    pub fn left_edge(&self) -> LineSegment {
        self.centerline.offset(self.half_thickness())
    }

    #[must_use]
    pub fn right_edge(&self) -> LineSegment {
        self.centerline.offset(-self.half_thickness())
    }

    /// Room-facing edge (right side).
    #[must_use]
    pub fn inner_edge(&self) -> LineSegment {
        self.right_edge()
    }

    /// Exterior-facing edge (left side).
    #[must_use]
    pub fn outer_edge(&self) -> LineSegment {
        self.left_edge()
    }

    /// Parallel line at any signed distance; positive = left.
    #[must_use]
    pub fn offset_by(&self, distance: f64) -> LineSegment {
        self.centerline.offset(distance)
    }

    /// Same wall walked the other way; left and right swap.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            centerline: self.centerline.reversed(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn horizontal() -> OffsetWall {
        OffsetWall::new(
            LineSegment::new(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0)),
            200.0,
        )
    }

    #[test]
    fn left_offset_is_at_positive_y() {
        let edge = horizontal().offset_by(100.0);
        for p in [edge.start, edge.end, edge.midpoint()] {
            assert_abs_diff_eq!(p.y, 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn inner_is_right_and_outer_is_left() {
        let w = horizontal();
        assert_abs_diff_eq!(w.inner_edge().start.y, -100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w.outer_edge().end.y, 100.0, epsilon = 1e-9);
        assert_eq!(w.inner_edge(), w.right_edge());
    }

    #[test]
    fn square_cap_is_longer_than_flat() {
        let flat = horizontal().polygon().unwrap();
        let square = horizontal().with_cap(CapStyle::Square).polygon().unwrap();
        assert_abs_diff_eq!(square.area() - flat.area(), 2.0 * 100.0 * 200.0, epsilon = 1e-6);
    }

    #[test]
    fn round_cap_covers_endpoint_neighbourhood() {
        let round = horizontal().with_cap(CapStyle::Round).polygon().unwrap();
        assert!(round.contains(&Point2::new(-90.0, 0.0)));
        assert!(round.contains(&Point2::new(1090.0, 0.0)));
    }

    #[test]
    fn reversing_swaps_sides() {
        let w = horizontal().reversed();
        assert_abs_diff_eq!(w.left_edge().start.y, -100.0, epsilon = 1e-9);
    }
}
