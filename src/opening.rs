//! Doors and windows positioned along a wall centerline.
//!
//! An opening only knows its own endpoints; it does not check that they lie
//! on a wall. Its cut polygon is subtracted from the rendered wall mass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DEFAULT_CUT_DEPTH;
use crate::geometry::{LineSegment, Polygon};
use crate::kernel::{buffer_segment, CapStyle};
use crate::math::{distance, Point2, TOLERANCE};

/// Default window sill height (mm).
pub const DEFAULT_SILL_HEIGHT: f64 = 900.0;

/// Default window head height (mm).
pub const DEFAULT_HEAD_HEIGHT: f64 = 2100.0;

/// Spacing between the glazing lines of a window (mm).
const GLASS_LINE_SPACING: f64 = 50.0;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn cut_polygon(start: &Point2, end: &Point2, cut_depth: f64) -> Option<Polygon> {
    buffer_segment(start, end, cut_depth / 2.0, CapStyle::Flat)
}

/// Which way a door leaf opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    #[default]
    Left,
    Right,
    Double,
}

/// A circular swing arc. Angles are in degrees, counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwingArc {
    pub center: [f64; 2],
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl SwingArc {
    fn new(center: &Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center: [center.x, center.y],
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Angular extent in degrees.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    id: String,
    start: Point2,
    end: Point2,
    swing: SwingKind,
    cut_depth: f64,
}

impl Door {
    /// Creates a door with a fresh id and the default cut depth.
    #[must_use]
    pub fn new(start: Point2, end: Point2, swing: SwingKind) -> Self {
        Self {
            id: new_id(),
            start,
            end,
            swing,
            cut_depth: DEFAULT_CUT_DEPTH,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_cut_depth(mut self, cut_depth: f64) -> Self {
        self.cut_depth = cut_depth;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
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
    pub fn swing(&self) -> SwingKind {
        self.swing
    }

    #[must_use]
    pub fn cut_depth(&self) -> f64 {
        self.cut_depth
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        LineSegment::new(self.start, self.end).midpoint()
    }

    /// Region removed from the rendered wall mass; `None` for a zero-width
    /// door.
    #[must_use]
    pub fn cut_polygon(&self) -> Option<Polygon> {
        cut_polygon(&self.start, &self.end, self.cut_depth)
    }

    fn base_angle(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x).to_degrees()
    }

    /// The overall swing arc.
    ///
    /// Left swings pivot on the start point, right swings on the end point
    /// a quarter turn further round. A double door pivots on the midpoint
    /// with half the width as radius and sweeps a half turn.
    #[must_use]
    pub fn swing_arc(&self) -> SwingArc {
        let base = self.base_angle();
        let width = self.width();
        match self.swing {
            SwingKind::Left => SwingArc::new(&self.start, width, base, base + 90.0),
            SwingKind::Right => SwingArc::new(&self.end, width, base + 90.0, base + 180.0),
            SwingKind::Double => {
                SwingArc::new(&self.midpoint(), width / 2.0, base, base + 180.0)
            }
        }
    }

    /// One arc per leaf. A double door splits its half turn into two
    /// quarter-turn leaves around the midpoint.
    #[must_use]
    pub fn leaf_arcs(&self) -> Vec<SwingArc> {
        match self.swing {
            SwingKind::Left | SwingKind::Right => vec![self.swing_arc()],
            SwingKind::Double => {
                let base = self.base_angle();
                let radius = self.width() / 2.0;
                let mid = self.midpoint();
                vec![
                    SwingArc::new(&mid, radius, base, base + 90.0),
                    SwingArc::new(&mid, radius, base + 90.0, base + 180.0),
                ]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    id: String,
    start: Point2,
    end: Point2,
    sill_height: f64,
    head_height: f64,
    cut_depth: f64,
}

impl Window {
    /// Creates a window with a fresh id, default sill/head heights and the
    /// default cut depth.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            id: new_id(),
            start,
            end,
            sill_height: DEFAULT_SILL_HEIGHT,
            head_height: DEFAULT_HEAD_HEIGHT,
            cut_depth: DEFAULT_CUT_DEPTH,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_heights(mut self, sill_height: f64, head_height: f64) -> Self {
        self.sill_height = sill_height;
        self.head_height = head_height;
        self
    }

    #[must_use]
    pub fn with_cut_depth(mut self, cut_depth: f64) -> Self {
        self.cut_depth = cut_depth;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
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
    pub fn sill_height(&self) -> f64 {
        self.sill_height
    }

    #[must_use]
    pub fn head_height(&self) -> f64 {
        self.head_height
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.head_height - self.sill_height
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    #[must_use]
    pub fn cut_polygon(&self) -> Option<Polygon> {
        cut_polygon(&self.start, &self.end, self.cut_depth)
    }

    /// Three glazing lines: one on the centerline and one 50 mm to either
    /// side. Empty for a zero-width window.
    #[must_use]
    pub fn glass_lines(&self) -> Vec<LineSegment> {
        let line = LineSegment::new(self.start, self.end);
        if line.length() < TOLERANCE {
            return Vec::new();
        }
        [-GLASS_LINE_SPACING, 0.0, GLASS_LINE_SPACING]
            .into_iter()
            .map(|d| line.offset(d))
            .collect()
    }
}
