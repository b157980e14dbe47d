pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod lot;
pub mod math;
pub mod opening;
pub mod plan;
pub mod room;
pub mod units;
pub mod validation;
pub mod wall;

pub use config::EngineConfig;
pub use error::{FloorplanError, Result};
pub use plan::{assemble, assemble_json, BuiltPlan, Command, CoordsRequest, FloorPlan};
pub use wall::WallNetwork;
