use crate::math::polygon_2d::left_normal;
use crate::math::{Point2, Vector2, TOLERANCE};

/// A straight centerline or edge between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2,
    pub end: Point2,
}

impl LineSegment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, or the zero vector for a
    /// zero-length segment.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        let d = self.end - self.start;
        let len = d.norm();
        if len < TOLERANCE {
            Vector2::zeros()
        } else {
            d / len
        }
    }

    /// Unit normal pointing to the left of the walking direction.
    #[must_use]
    pub fn normal(&self) -> Vector2 {
        left_normal(self.direction())
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        Point2::from((self.start.coords + self.end.coords) * 0.5)
    }

    /// Parallel copy shifted by `distance`; positive = left side.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Self {
        let shift = self.normal() * distance;
        Self::new(self.start + shift, self.end + shift)
    }

    /// Extends the segment by `distance` past both endpoints.
    #[must_use]
    pub fn extended(&self, distance: f64) -> Self {
        let d = self.direction() * distance;
        Self::new(self.start - d, self.end + d)
    }

    /// The same segment walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}
