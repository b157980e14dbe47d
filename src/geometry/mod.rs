pub mod polygon;
pub mod segment;

pub use polygon::{Bounds, MultiPolygon, Polygon};
pub use segment::LineSegment;
