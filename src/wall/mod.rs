//! Walls: single centerline segments, their offset curves, corner and
//! junction resolution, and the network that merges them into a mass.

mod corner;
mod junction;
mod network;
mod offset;
mod segment;

pub use corner::{compute_mitre_point, WallCorner, ACUTE_ANGLE_DEG, ACUTE_CLAMP_FACTOR};
pub use junction::{find_crossings, find_t_junctions, Crossing, Junctions, TJunction};
pub use network::{rooms_in, WallNetwork, DEFAULT_SNAP_TOLERANCE};
pub use offset::{OffsetWall, MITRE_LIMIT};
pub use segment::{WallSegment, DEFAULT_MAX_WALL_THICKNESS, DEFAULT_WALL_THICKNESS};
