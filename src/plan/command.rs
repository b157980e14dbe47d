use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{PlanError, Result};
use crate::lot::{build_lot_geometry, LotGeometry, Setbacks, DEFAULT_NORTH_ANGLE};
use crate::math::{points_equal, pt, Point2};
use crate::opening::{new_id, Door, SwingKind, Window, DEFAULT_HEAD_HEIGHT, DEFAULT_SILL_HEIGHT};
use crate::units::Unit;
use crate::validation::{
    has_errors, non_finite_points, GeometryIssue, IssueCode, ValidatePolygon,
};
use crate::wall::WallSegment;

use super::built::BuiltPlan;
use super::floor::{FixtureKind, FloorPlan, Furniture, Label};

/// Floor that commands land on before any `floor` command.
pub const DEFAULT_FLOOR_LEVEL: u32 = 1;

fn default_sill() -> f64 {
    DEFAULT_SILL_HEIGHT
}

fn default_head() -> f64 {
    DEFAULT_HEAD_HEIGHT
}

fn default_north() -> f64 {
    DEFAULT_NORTH_ANGLE
}

/// One step of a plan description, in millimetres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    Wall {
        start: [f64; 2],
        end: [f64; 2],
        #[serde(default)]
        thickness: Option<f64>,
        #[serde(default)]
        id: Option<String>,
    },
    Door {
        start: [f64; 2],
        end: [f64; 2],
        #[serde(default)]
        swing: SwingKind,
        #[serde(default)]
        id: Option<String>,
    },
    Window {
        start: [f64; 2],
        end: [f64; 2],
        #[serde(default = "default_sill")]
        sill_height: f64,
        #[serde(default = "default_head")]
        head_height: f64,
        #[serde(default)]
        id: Option<String>,
    },
    Label {
        position: [f64; 2],
        text: String,
    },
    /// A label that also colours its room.
    Room {
        position: [f64; 2],
        text: String,
        #[serde(default)]
        color: Option<String>,
    },
    Lot {
        vertices: Vec<[f64; 2]>,
    },
    Setback(Setbacks),
    North {
        #[serde(default = "default_north")]
        angle: f64,
    },
    Furniture {
        position: [f64; 2],
        fixture: String,
        #[serde(default)]
        rotation: f64,
    },
    Floor {
        level: i64,
    },
}

/// A built floor and its level.
#[derive(Debug, Clone)]
pub struct BuiltFloor {
    pub level: u32,
    pub plan: BuiltPlan,
}

/// Every built floor, in level order, plus the non-blocking diagnostics
/// raised while reading the commands.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub floors: Vec<BuiltFloor>,
    pub warnings: Vec<GeometryIssue>,
}

impl Assembly {
    #[must_use]
    pub fn floor(&self, level: u32) -> Option<&BuiltPlan> {
        self.floors.iter().find(|f| f.level == level).map(|f| &f.plan)
    }
}

/// Site-wide commands; the first of each kind wins.
#[derive(Default)]
struct Site {
    lot: Option<Vec<Point2>>,
    setbacks: Option<Setbacks>,
    north: Option<f64>,
}

/// Reads commands in order and builds every floor.
///
/// Commands land on the current floor, which starts at 1 and is switched
/// by `floor`. The lot, setback and north commands apply to the whole site
/// and are shared by every floor.
///
/// # Errors
///
/// Returns `PlanError::Rejected` with every blocking issue found across
/// all commands.
pub fn assemble(commands: &[Command], config: &EngineConfig) -> Result<Assembly> {
    let mut issues: Vec<GeometryIssue> = Vec::new();
    let mut floors: BTreeMap<u32, FloorPlan> = BTreeMap::new();
    let mut labels_seen: HashSet<(u32, bool, String)> = HashSet::new();
    let mut site = Site::default();
    let mut level = DEFAULT_FLOOR_LEVEL;
    let mut wall_count = 0usize;

    for (index, command) in commands.iter().enumerate() {
        let prefix = format!("command {index}");
        let mut report = |issue: GeometryIssue| issues.push(issue.prefixed(&prefix));
        let floor = floors
            .entry(level)
            .or_insert_with(|| FloorPlan::new(config.snap_tolerance));

        match command {
            Command::Wall {
                start,
                end,
                thickness,
                id,
            } => {
                wall_count += 1;
                let (start, end) = (pt(*start), pt(*end));
                let thickness = thickness.unwrap_or(config.default_wall_thickness);
                let found = WallSegment::check(&start, &end, thickness, config.max_wall_thickness);
                let blocking = has_errors(&found);
                found.into_iter().for_each(&mut report);
                if !blocking {
                    let id = id.clone().unwrap_or_else(new_id);
                    floor
                        .walls_mut()
                        .push(WallSegment::new(start, end, thickness)?.with_id(id));
                }
            }
            Command::Door {
                start,
                end,
                swing,
                id,
            } => {
                let (start, end) = (pt(*start), pt(*end));
                if blocked(non_finite_points(&[start, end], "door point"), &mut report) {
                    continue;
                }
                if points_equal(&start, &end) {
                    report(zero_width("door", &start));
                    continue;
                }
                let mut door =
                    Door::new(start, end, *swing).with_cut_depth(config.default_cut_depth);
                if let Some(id) = id {
                    door = door.with_id(id.clone());
                }
                floor.add_door(door);
            }
            Command::Window {
                start,
                end,
                sill_height,
                head_height,
                id,
            } => {
                let (start, end) = (pt(*start), pt(*end));
                if blocked(non_finite_points(&[start, end], "window point"), &mut report) {
                    continue;
                }
                if points_equal(&start, &end) {
                    report(zero_width("window", &start));
                    continue;
                }
                let mut window = Window::new(start, end)
                    .with_heights(*sill_height, *head_height)
                    .with_cut_depth(config.default_cut_depth);
                if let Some(id) = id {
                    window = window.with_id(id.clone());
                }
                floor.add_window(window);
            }
            Command::Label { position, text } => {
                let position = pt(*position);
                if blocked(non_finite_points(&[position], "label position"), &mut report) {
                    continue;
                }
                if let Some(issue) = check_label(&mut labels_seen, level, false, text) {
                    report(issue);
                    continue;
                }
                floor.add_label(Label::new(text.clone(), position));
            }
            Command::Room {
                position,
                text,
                color,
            } => {
                let position = pt(*position);
                if blocked(non_finite_points(&[position], "room position"), &mut report) {
                    continue;
                }
                if let Some(issue) = check_label(&mut labels_seen, level, true, text) {
                    report(issue);
                    continue;
                }
                let mut label = Label::new(text.clone(), position);
                label.color.clone_from(color);
                floor.add_label(label);
            }
            Command::Lot { vertices } => {
                if vertices.len() < 3 {
                    report(GeometryIssue::error(
                        IssueCode::LotTooFewPoints,
                        format!("lot needs at least 3 vertices, got {}", vertices.len()),
                    ));
                } else if site.lot.is_none() {
                    site.lot = Some(vertices.iter().copied().map(pt).collect());
                }
            }
            Command::Setback(setbacks) => {
                let sides = [
                    ("front", setbacks.front),
                    ("rear", setbacks.rear),
                    ("left", setbacks.left),
                    ("right", setbacks.right),
                ];
                let mut negative = false;
                for (side, value) in sides {
                    if !value.is_finite() || value < 0.0 {
                        negative = true;
                        report(GeometryIssue::error(
                            IssueCode::NegativeSetback,
                            format!(
                                "setback '{side}' must be a finite non-negative distance, \
                                 got {value}"
                            ),
                        ));
                    }
                }
                if !negative && site.setbacks.is_none() {
                    site.setbacks = Some(*setbacks);
                }
            }
            Command::North { angle } => {
                site.north.get_or_insert(*angle);
            }
            Command::Furniture {
                position,
                fixture,
                rotation,
            } => {
                let mut found = non_finite_points(&[pt(*position)], "furniture position");
                if !rotation.is_finite() {
                    found.push(GeometryIssue::error(
                        IssueCode::NonFiniteCoord,
                        format!("furniture rotation {rotation} is not finite"),
                    ));
                }
                if blocked(found, &mut report) {
                    continue;
                }
                match fixture.parse::<FixtureKind>() {
                    Ok(kind) => floor.add_furniture(Furniture {
                        kind,
                        position: *position,
                        rotation: *rotation,
                    }),
                    Err(err) => {
                        report(GeometryIssue::error(IssueCode::UnknownFixture, err.to_string()));
                    }
                }
            }
            Command::Floor { level: requested } => match u32::try_from(*requested) {
                Ok(n) if n >= 1 => level = n,
                _ => report(GeometryIssue::error(
                    IssueCode::InvalidFloorLevel,
                    PlanError::InvalidFloorLevel(*requested).to_string(),
                )),
            },
        }
    }

    if wall_count == 0 && site.lot.is_none() {
        issues.push(GeometryIssue::error(
            IssueCode::NoWalls,
            "no walls defined; at least one wall or a lot is required",
        ));
    }

    let lot = site_lot(&site, config, &mut issues);
    if has_errors(&issues) {
        issues.retain(GeometryIssue::is_error);
        return Err(PlanError::Rejected { issues }.into());
    }

    // Floors opened by a `floor` command with nothing on them are dropped,
    // unless the site has nothing else to show.
    floors.retain(|_, plan| !plan.is_empty());
    if floors.is_empty() {
        floors.insert(DEFAULT_FLOOR_LEVEL, FloorPlan::new(config.snap_tolerance));
    }

    let floors = floors
        .into_iter()
        .map(|(level, mut plan)| {
            plan.set_lot(lot.clone());
            let plan = plan.build();
            info!(
                floor = level,
                rooms = plan.rooms().len(),
                footprint_sq_m = plan.footprint_sq_m(),
                "floor built"
            );
            BuiltFloor { level, plan }
        })
        .collect();
    debug!(warnings = issues.len(), "assembly finished");
    Ok(Assembly {
        floors,
        warnings: issues,
    })
}

/// Reports every issue in `found`; `true` when any of them blocks the command.
fn blocked(found: Vec<GeometryIssue>, report: &mut impl FnMut(GeometryIssue)) -> bool {
    let blocking = has_errors(&found);
    found.into_iter().for_each(report);
    blocking
}

fn zero_width(kind: &str, at: &Point2) -> GeometryIssue {
    GeometryIssue::error(
        IssueCode::ZeroWidthOpening,
        format!("{kind} has zero width at ({}, {})", at.x, at.y),
    )
    .at(at)
}

/// Rejects empty names and names repeated on the same floor. Plain labels
/// and room names are checked separately.
fn check_label(
    seen: &mut HashSet<(u32, bool, String)>,
    level: u32,
    is_room: bool,
    text: &str,
) -> Option<GeometryIssue> {
    let kind = if is_room { "room" } else { "label" };
    if text.trim().is_empty() {
        return Some(GeometryIssue::error(
            IssueCode::EmptyLabel,
            format!("{kind} has empty text"),
        ));
    }
    if !seen.insert((level, is_room, text.to_owned())) {
        return Some(GeometryIssue::error(
            IssueCode::DuplicateLabel,
            format!("duplicate {kind} '{text}'"),
        ));
    }
    None
}

fn site_lot(
    site: &Site,
    config: &EngineConfig,
    issues: &mut Vec<GeometryIssue>,
) -> Option<LotGeometry> {
    let vertices = site.lot.as_ref()?;
    let result = ValidatePolygon::new(vertices.clone())
        .auto_fix(config.auto_fix)
        .close_tolerance(config.close_tolerance)
        .execute();
    let valid = result.valid();
    issues.extend(result.issues.into_iter().map(|i| i.prefixed("lot")));
    let boundary = result.polygon.filter(|_| valid)?;
    Some(build_lot_geometry(
        boundary,
        site.setbacks.unwrap_or_default(),
        site.north.unwrap_or(DEFAULT_NORTH_ANGLE),
    ))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WallInput {
    pub start: [f64; 2],
    pub end: [f64; 2],
    #[serde(default)]
    pub thickness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DoorInput {
    pub start: [f64; 2],
    pub end: [f64; 2],
    #[serde(default)]
    pub swing: SwingKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowInput {
    pub start: [f64; 2],
    pub end: [f64; 2],
    #[serde(default = "default_sill")]
    pub sill_height: f64,
    #[serde(default = "default_head")]
    pub head_height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelInput {
    pub position: [f64; 2],
    pub text: String,
}

/// Parses a JSON array of commands and assembles it.
///
/// # Errors
///
/// Returns `PlanError::Json` for malformed input, otherwise the rejections
/// of [`assemble`].
pub fn assemble_json(json: &str, config: &EngineConfig) -> Result<Assembly> {
    let commands: Vec<Command> = serde_json::from_str(json).map_err(PlanError::from)?;
    debug!(commands = commands.len(), "parsed command list");
    assemble(&commands, config)
}

/// A raw coordinate payload in any supported unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoordsRequest {
    pub walls: Vec<WallInput>,
    #[serde(default)]
    pub doors: Vec<DoorInput>,
    #[serde(default)]
    pub windows: Vec<WindowInput>,
    #[serde(default)]
    pub labels: Vec<LabelInput>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl CoordsRequest {
    /// # Errors
    ///
    /// Returns `PlanError::Json` when the payload does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(PlanError::from)?)
    }

    /// Converts the payload to millimetre commands.
    ///
    /// Thicknesses that are given are converted; missing ones are left for
    /// the engine default, which is already in millimetres. Window sill and
    /// head heights are always in millimetres.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::UnknownUnit` for an unsupported unit name.
    pub fn to_commands(&self, default_unit: Unit) -> Result<Vec<Command>> {
        let unit = match &self.unit {
            Some(name) => name.parse::<Unit>()?,
            None => default_unit,
        };
        let mm = |p: [f64; 2]| [unit.to_mm(p[0]), unit.to_mm(p[1])];

        let walls = self.walls.iter().map(|w| Command::Wall {
            start: mm(w.start),
            end: mm(w.end),
            thickness: w.thickness.map(|t| unit.to_mm(t)),
            id: None,
        });
        let doors = self.doors.iter().map(|d| Command::Door {
            start: mm(d.start),
            end: mm(d.end),
            swing: d.swing,
            id: None,
        });
        let windows = self.windows.iter().map(|w| Command::Window {
            start: mm(w.start),
            end: mm(w.end),
            sill_height: w.sill_height,
            head_height: w.head_height,
            id: None,
        });
        let labels = self.labels.iter().map(|l| Command::Label {
            position: mm(l.position),
            text: l.text.clone(),
        });
        Ok(walls.chain(doors).chain(windows).chain(labels).collect())
    }

    /// Converts and assembles the payload.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::UnknownUnit` or the rejections of [`assemble`].
    pub fn build(&self, config: &EngineConfig) -> Result<Assembly> {
        assemble(&self.to_commands(config.default_unit)?, config)
    }
}
