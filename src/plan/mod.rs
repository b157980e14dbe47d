//! Floor plan assembly: commands in, built floors out.
//!
//! Rooms are always detected on the uncut wall mass; door and window cuts
//! only affect the geometry handed to renderers.

mod built;
mod command;
mod floor;

pub use built::{
    BuiltPlan, Compliance, DoorSummary, LotSummary, PlanSummary, PolygonSummary, RoomSummary,
    WallSummary, WindowSummary,
};
pub use command::{
    assemble, assemble_json, Assembly, BuiltFloor, Command, CoordsRequest, DoorInput, LabelInput,
    WallInput, WindowInput, DEFAULT_FLOOR_LEVEL,
};
pub use floor::{FixtureKind, FloorPlan, Furniture, Label};
