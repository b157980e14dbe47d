use serde::Serialize;

use crate::geometry::{Bounds, MultiPolygon, Polygon};
use crate::kernel;
use crate::lot::{LotGeometry, Setbacks};
use crate::math::Point2;
use crate::opening::{Door, SwingArc, SwingKind, Window};
use crate::room::{Dimensions, Room};
use crate::units::area_mm2_to_m2;
use crate::wall::WallSegment;

use super::floor::Furniture;

/// Footprint area (mm²) left outside the setback envelope that still counts
/// as covered.
const COVERAGE_TOLERANCE: f64 = 1.0;

/// Whether the building footprint fits inside the lot's setback envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compliance {
    Ok,
    Violation,
}

/// Immutable result of building one floor.
#[derive(Debug, Clone)]
pub struct BuiltPlan {
    pub(super) wall_geometry: MultiPolygon,
    pub(super) footprint: MultiPolygon,
    pub(super) wall_segments: Vec<WallSegment>,
    pub(super) rooms: Vec<Room>,
    pub(super) doors: Vec<Door>,
    pub(super) windows: Vec<Window>,
    pub(super) furniture: Vec<Furniture>,
    pub(super) lot: Option<LotGeometry>,
}

impl BuiltPlan {
    /// Wall mass with door and window cuts applied.
    #[must_use]
    pub fn wall_geometry(&self) -> &MultiPolygon {
        &self.wall_geometry
    }

    #[must_use]
    pub fn wall_segments(&self) -> &[WallSegment] {
        &self.wall_segments
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    #[must_use]
    pub fn furniture(&self) -> &[Furniture] {
        &self.furniture
    }

    #[must_use]
    pub fn lot(&self) -> Option<&LotGeometry> {
        self.lot.as_ref()
    }

    /// Lot bounds when there is a lot, else the wall mass bounds.
    #[must_use]
    pub fn bounding_box(&self) -> Bounds {
        match &self.lot {
            Some(lot) => lot.boundary().bounds(),
            None => self.wall_geometry.bounds(),
        }
    }

    /// Outer outline of the uncut wall mass, holes dropped.
    #[must_use]
    pub fn footprint(&self) -> &MultiPolygon {
        &self.footprint
    }

    /// Footprint area in m², rounded to two decimals.
    #[must_use]
    pub fn footprint_sq_m(&self) -> f64 {
        round2(area_mm2_to_m2(self.footprint.area()))
    }

    /// `None` without a lot, a setback envelope or any walls.
    #[must_use]
    pub fn compliance(&self) -> Option<Compliance> {
        let envelope = self.lot.as_ref()?.setback_polygon()?;
        if self.footprint.is_empty() {
            return None;
        }
        let envelope = MultiPolygon::from(envelope.clone());
        let outside = kernel::difference(&self.footprint, &envelope);
        Some(if outside.area() < COVERAGE_TOLERANCE {
            Compliance::Ok
        } else {
            Compliance::Violation
        })
    }

    /// Serializable view for rendering and export adapters.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            wall_polygons: self.wall_geometry.iter().map(PolygonSummary::from).collect(),
            wall_segments: self.wall_segments.iter().map(WallSummary::from).collect(),
            rooms: self.rooms.iter().map(RoomSummary::from).collect(),
            doors: self.doors.iter().map(DoorSummary::from).collect(),
            windows: self.windows.iter().map(WindowSummary::from).collect(),
            furniture: self.furniture.clone(),
            bounding_box: self.bounding_box().to_array(),
            lot: self.lot.as_ref().map(LotSummary::from),
            building_footprint_sq_m: self.footprint_sq_m(),
            compliance: self.compliance(),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn xy(p: &Point2) -> [f64; 2] {
    [p.x, p.y]
}

fn ring(points: &[Point2]) -> Vec<[f64; 2]> {
    points.iter().map(xy).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub wall_polygons: Vec<PolygonSummary>,
    pub wall_segments: Vec<WallSummary>,
    pub rooms: Vec<RoomSummary>,
    pub doors: Vec<DoorSummary>,
    pub windows: Vec<WindowSummary>,
    pub furniture: Vec<Furniture>,
    pub bounding_box: [f64; 4],
    pub lot: Option<LotSummary>,
    pub building_footprint_sq_m: f64,
    pub compliance: Option<Compliance>,
}

/// Open rings: exterior first, then holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonSummary {
    pub exterior: Vec<[f64; 2]>,
    pub interiors: Vec<Vec<[f64; 2]>>,
}

impl From<&Polygon> for PolygonSummary {
    fn from(polygon: &Polygon) -> Self {
        Self {
            exterior: ring(polygon.exterior()),
            interiors: polygon.interiors().iter().map(|h| ring(h)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallSummary {
    pub id: Option<String>,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub thickness: f64,
}

impl From<&WallSegment> for WallSummary {
    fn from(wall: &WallSegment) -> Self {
        Self {
            id: wall.id().map(str::to_owned),
            start: xy(&wall.start()),
            end: xy(&wall.end()),
            thickness: wall.thickness(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub name: String,
    pub color: Option<String>,
    pub area_sq_m: f64,
    pub area_sq_ft: f64,
    pub centroid: [f64; 2],
    pub dimensions_mm: Dimensions,
    pub perimeter_mm: f64,
    pub polygon: Vec<[f64; 2]>,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name().to_owned(),
            color: room.color().map(str::to_owned),
            area_sq_m: round2(room.area_sq_m()),
            area_sq_ft: round2(room.area_sq_ft()),
            centroid: xy(&room.centroid()),
            dimensions_mm: room.dimensions(),
            perimeter_mm: room.perimeter(),
            polygon: ring(room.polygon().exterior()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoorSummary {
    pub id: String,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub width: f64,
    pub swing: SwingKind,
    pub arcs: Vec<SwingArc>,
}

impl From<&Door> for DoorSummary {
    fn from(door: &Door) -> Self {
        Self {
            id: door.id().to_owned(),
            start: xy(&door.start()),
            end: xy(&door.end()),
            width: door.width(),
            swing: door.swing(),
            arcs: door.leaf_arcs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub id: String,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub width: f64,
    pub sill_height: f64,
    pub head_height: f64,
}

impl From<&Window> for WindowSummary {
    fn from(window: &Window) -> Self {
        Self {
            id: window.id().to_owned(),
            start: xy(&window.start()),
            end: xy(&window.end()),
            width: window.width(),
            sill_height: window.sill_height(),
            head_height: window.head_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotSummary {
    pub boundary: Vec<[f64; 2]>,
    pub setback_polygon: Option<Vec<[f64; 2]>>,
    pub setbacks: Setbacks,
    pub north_angle: f64,
    pub area_sq_m: f64,
}

impl From<&LotGeometry> for LotSummary {
    fn from(lot: &LotGeometry) -> Self {
        Self {
            boundary: ring(lot.boundary().exterior()),
            setback_polygon: lot.setback_polygon().map(|p| ring(p.exterior())),
            setbacks: lot.setbacks(),
            north_angle: lot.north_angle(),
            area_sq_m: round2(lot.area_sq_m()),
        }
    }
}
