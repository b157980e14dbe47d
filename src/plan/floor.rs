use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;
use crate::geometry::{MultiPolygon, Polygon};
use crate::kernel;
use crate::lot::LotGeometry;
use crate::math::Point2;
use crate::opening::{Door, Window};
use crate::room::Room;
use crate::wall::{rooms_in, WallNetwork};

use super::built::BuiltPlan;

/// A name placed at a point; it names the room containing the point.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point2,
    pub color: Option<String>,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>, position: Point2) -> Self {
        Self {
            text: text.into(),
            position,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Fixture types that may be placed as furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixtureKind {
    Toilet,
    Sink,
    Bathtub,
    Shower,
    BedSingle,
    BedDouble,
    Sofa,
    Desk,
    DiningTable,
    Stair,
}

impl FixtureKind {
    pub const ALL: [FixtureKind; 10] = [
        FixtureKind::Toilet,
        FixtureKind::Sink,
        FixtureKind::Bathtub,
        FixtureKind::Shower,
        FixtureKind::BedSingle,
        FixtureKind::BedDouble,
        FixtureKind::Sofa,
        FixtureKind::Desk,
        FixtureKind::DiningTable,
        FixtureKind::Stair,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FixtureKind::Toilet => "toilet",
            FixtureKind::Sink => "sink",
            FixtureKind::Bathtub => "bathtub",
            FixtureKind::Shower => "shower",
            FixtureKind::BedSingle => "bed-single",
            FixtureKind::BedDouble => "bed-double",
            FixtureKind::Sofa => "sofa",
            FixtureKind::Desk => "desk",
            FixtureKind::DiningTable => "dining-table",
            FixtureKind::Stair => "stair",
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixtureKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixtureKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PlanError::UnknownFixture(s.to_owned()))
    }
}

/// A placed fixture. Carried through to the built plan untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Furniture {
    pub kind: FixtureKind,
    pub position: [f64; 2],
    /// Degrees, counter-clockwise.
    pub rotation: f64,
}

/// Mutable input for one floor: walls, openings, labels, furniture and the
/// site lot.
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    walls: WallNetwork,
    doors: Vec<Door>,
    windows: Vec<Window>,
    labels: Vec<Label>,
    furniture: Vec<Furniture>,
    lot: Option<LotGeometry>,
}

impl FloorPlan {
    #[must_use]
    pub fn new(snap_tolerance: f64) -> Self {
        Self {
            walls: WallNetwork::new(snap_tolerance),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn walls(&self) -> &WallNetwork {
        &self.walls
    }

    pub fn walls_mut(&mut self) -> &mut WallNetwork {
        &mut self.walls
    }

    pub fn add_door(&mut self, door: Door) {
        self.doors.push(door);
    }

    pub fn add_window(&mut self, window: Window) {
        self.windows.push(window);
    }

    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn add_furniture(&mut self, furniture: Furniture) {
        self.furniture.push(furniture);
    }

    pub fn set_lot(&mut self, lot: Option<LotGeometry>) {
        self.lot = lot;
    }

    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// `true` when nothing has been placed on this floor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
            && self.doors.is_empty()
            && self.windows.is_empty()
            && self.labels.is_empty()
            && self.furniture.is_empty()
    }

    /// Merges walls, finds rooms in the uncut mass, then cuts openings out
    /// of the mass used for rendering.
    #[must_use]
    pub fn build(&self) -> BuiltPlan {
        let merged = self.walls.merge_walls();
        let room_polygons = rooms_in(&merged);

        let cuts: Vec<Polygon> = self
            .doors
            .iter()
            .filter_map(Door::cut_polygon)
            .chain(self.windows.iter().filter_map(Window::cut_polygon))
            .collect();
        let rendered = if cuts.is_empty() {
            merged.clone()
        } else {
            kernel::difference(&merged, &kernel::union_all(&cuts))
        };

        let rooms: Vec<Room> = room_polygons
            .into_iter()
            .enumerate()
            .map(|(i, polygon)| {
                let (name, color) = self.label_for(&polygon, i);
                Room::new(name, polygon, color)
            })
            .collect();
        debug!(
            walls = self.walls.len(),
            openings = cuts.len(),
            rooms = rooms.len(),
            "floor plan built"
        );

        BuiltPlan {
            wall_geometry: rendered,
            footprint: footprint_of(&merged),
            wall_segments: self.walls.segments().to_vec(),
            rooms,
            doors: self.doors.clone(),
            windows: self.windows.clone(),
            furniture: self.furniture.clone(),
            lot: self.lot.clone(),
        }
    }

    /// The first label strictly inside the room, else `Room {n}`.
    fn label_for(&self, room: &Polygon, index: usize) -> (String, Option<String>) {
        self.labels
            .iter()
            .find(|l| room.contains(&l.position))
            .map_or_else(
                || (format!("Room {}", index + 1), None),
                |l| (l.text.clone(), l.color.clone()),
            )
    }
}

/// Union of the outer boundaries of a mass, holes dropped.
///
/// Called on the wall mass before door and window cuts, so an opening never
/// notches the footprint or its compliance check.
fn footprint_of(mass: &MultiPolygon) -> MultiPolygon {
    let outers: Vec<Polygon> = mass.iter().map(Polygon::without_holes).collect();
    kernel::union_all(&outers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::opening::SwingKind;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn rectangle_plan() -> FloorPlan {
        let mut plan = FloorPlan::default();
        let walls = plan.walls_mut();
        walls.add(p(0.0, 0.0), p(5000.0, 0.0), 200.0).unwrap();
        walls.add(p(5000.0, 0.0), p(5000.0, 4000.0), 200.0).unwrap();
        walls.add(p(5000.0, 4000.0), p(0.0, 4000.0), 200.0).unwrap();
        walls.add(p(0.0, 4000.0), p(0.0, 0.0), 200.0).unwrap();
        plan
    }

    #[test]
    fn unlabelled_rooms_are_numbered() {
        let built = rectangle_plan().build();
        assert_eq!(built.rooms().len(), 1);
        assert_eq!(built.rooms()[0].name(), "Room 1");
        assert!(built.rooms()[0].color().is_none());
    }

    #[test]
    fn label_inside_names_the_room() {
        let mut plan = rectangle_plan();
        plan.add_label(Label::new("Garage", p(9000.0, 9000.0)));
        plan.add_label(Label::new("Kitchen", p(2500.0, 2000.0)).with_color("#eeddcc"));
        let built = plan.build();
        assert_eq!(built.rooms()[0].name(), "Kitchen");
        assert_eq!(built.rooms()[0].color(), Some("#eeddcc"));
    }

    #[test]
    fn partition_rooms_get_their_own_labels() {
        let mut plan = rectangle_plan();
        plan.walls_mut()
            .add(p(3000.0, 0.0), p(3000.0, 4000.0), 150.0)
            .unwrap();
        plan.add_label(Label::new("Bed", p(1500.0, 2000.0)));
        plan.add_label(Label::new("Bath", p(4000.0, 2000.0)));
        let built = plan.build();
        let mut names: Vec<&str> = built.rooms().iter().map(Room::name).collect();
        names.sort_unstable();
        assert_eq!(names, ["Bath", "Bed"]);
    }

    #[test]
    fn openings_cut_render_mass_but_keep_rooms() {
        let mut plan = rectangle_plan();
        let uncut = plan.walls().merge_walls().area();
        plan.add_door(Door::new(p(2000.0, 0.0), p(2900.0, 0.0), SwingKind::Left));
        plan.add_window(Window::new(p(5000.0, 1000.0), p(5000.0, 2200.0)));
        let built = plan.build();
        assert_eq!(built.rooms().len(), 1);
        assert!(built.wall_geometry().area() < uncut - 900.0 * 200.0);
        assert_eq!(built.doors().len(), 1);
        assert_eq!(built.windows().len(), 1);
    }

    #[test]
    fn footprint_ignores_openings() {
        let plain = rectangle_plan().build();
        let mut plan = rectangle_plan();
        plan.add_door(Door::new(p(2000.0, 0.0), p(2900.0, 0.0), SwingKind::Right));
        let with_door = plan.build();
        assert!((plain.footprint().area() - with_door.footprint().area()).abs() < 1e-6);
        assert!(plain.footprint().area() > 5000.0 * 4000.0);
    }

    #[test]
    fn fixtures_parse() {
        assert_eq!("bed-double".parse::<FixtureKind>().unwrap(), FixtureKind::BedDouble);
        assert!(matches!(
            "piano".parse::<FixtureKind>(),
            Err(PlanError::UnknownFixture(ref s)) if s == "piano"
        ));
    }
}
