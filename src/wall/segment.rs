use crate::error::{GeometryError, Result};
use crate::geometry::{LineSegment, Polygon};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::validation::{non_finite_points, GeometryIssue, IssueCode};

use super::offset::OffsetWall;

/// Wall thickness used when none is given (mm).
pub const DEFAULT_WALL_THICKNESS: f64 = 200.0;

/// Thickness above which a wall is reported as unusually thick (mm).
pub const DEFAULT_MAX_WALL_THICKNESS: f64 = 1000.0;

/// A single wall: a centerline between two points plus a thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    start: Point2,
    end: Point2,
    thickness: f64,
    id: Option<String>,
}

impl WallSegment {
    /// Creates a wall.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN/infinite input,
    /// `GeometryError::InvalidThickness` if `thickness` is not positive and
    /// `GeometryError::ZeroLengthWall` if both endpoints coincide.
    pub fn new(start: Point2, end: Point2, thickness: f64) -> Result<Self> {
        if let Some(bad) = [start, end]
            .into_iter()
            .find(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(GeometryError::NonFinite { x: bad.x, y: bad.y }.into());
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(GeometryError::InvalidThickness(thickness).into());
        }
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::ZeroLengthWall {
                start: [start.x, start.y],
                end: [end.x, end.y],
            }
            .into());
        }
        Ok(Self {
            start,
            end,
            thickness,
            id: None,
        })
    }

    /// Attaches a stable identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn centerline(&self) -> LineSegment {
        LineSegment::new(self.start, self.end)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.centerline().length()
    }

    /// Unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.centerline().direction()
    }

    /// Unit normal pointing left of the direction.
    #[must_use]
    pub fn normal(&self) -> Vector2 {
        self.centerline().normal()
    }

    /// The wall body: the centerline buffered by half the thickness with
    /// flat ends.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        let n = self.normal() * (self.thickness * 0.5);
        Polygon::from_parts(
            vec![
                self.start - n,
                self.end - n,
                self.end + n,
                self.start + n,
            ],
            Vec::new(),
        )
    }

    #[must_use]
    pub fn to_offset_wall(&self) -> OffsetWall {
        OffsetWall::new(self.centerline(), self.thickness)
    }

    /// Corners on the right-hand, room-facing side: `(start, end)`.
    #[must_use]
    pub fn inner_edge_points(&self) -> (Point2, Point2) {
        let n = self.normal() * (self.thickness * 0.5);
        (self.start - n, self.end - n)
    }

    /// Corners on the left-hand, exterior side: `(start, end)`.
    #[must_use]
    pub fn outer_edge_points(&self) -> (Point2, Point2) {
        let n = self.normal() * (self.thickness * 0.5);
        (self.start + n, self.end + n)
    }

    /// Returns `true` if `point` lies within `tolerance` of the wall body.
    #[must_use]
    pub fn point_is_on_wall(&self, point: &Point2, tolerance: f64) -> bool {
        self.to_polygon().distance_to_point(point) <= tolerance
    }

    /// Diagnostics for a prospective wall, without constructing it.
    #[must_use]
    pub fn check(
        start: &Point2,
        end: &Point2,
        thickness: f64,
        max_thickness: f64,
    ) -> Vec<GeometryIssue> {
        let mut issues = non_finite_points(&[*start, *end], "wall endpoint");
        if !issues.is_empty() {
            return issues;
        }
        if (end - start).norm() < TOLERANCE {
            issues.push(
                GeometryIssue::error(
                    IssueCode::ZeroLength,
                    format!(
                        "wall from ({}, {}) to ({}, {}) has zero length",
                        start.x, start.y, end.x, end.y
                    ),
                )
                .at(start),
            );
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            issues.push(GeometryIssue::error(
                IssueCode::InvalidThickness,
                format!("wall thickness {thickness} must be positive"),
            ));
        } else if thickness > max_thickness {
            issues.push(GeometryIssue::warning(
                IssueCode::ThickWall,
                format!("wall thickness {thickness}mm is unusually large"),
            ));
        }
        issues
    }

    /// Diagnostics for this wall.
    #[must_use]
    pub fn issues(&self, max_thickness: f64) -> Vec<GeometryIssue> {
        Self::check(&self.start, &self.end, self.thickness, max_thickness)
    }

    pub(crate) fn set_endpoints(&mut self, start: Point2, end: Point2) {
        self.start = start;
        self.end = end;
    }
}
