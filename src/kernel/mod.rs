//! Planar polygon kernel.
//!
//! Every boolean, buffer and repair primitive the wall, room and validation
//! layers need goes through this module. Nothing above it talks to the
//! overlay backend directly.

mod buffer;
mod overlay;

pub use buffer::{
    buffer_segment, close_gaps, dilate, disc, erode, offset_polygon, offset_ring, CapStyle,
    JoinStyle,
};
pub(crate) use buffer::arc_points;
pub use overlay::{difference, intersection, make_valid, union_all, union_rings};

/// Contours and pieces with less area than this (mm²) are dropped from
/// kernel results.
pub const SLIVER_AREA: f64 = 1e-6;
