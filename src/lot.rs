//! Property boundary and the buildable envelope left after setbacks.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::geometry::{MultiPolygon, Polygon};
use crate::kernel::offset_polygon;
use crate::math::Point2;
use crate::units::area_mm2_to_m2;
use crate::validation::ValidatePolygon;
use crate::wall::MITRE_LIMIT;

/// North direction when none is given (degrees, 90 = up).
pub const DEFAULT_NORTH_ANGLE: f64 = 90.0;

/// Mitre limit for general polygon offsets.
const POLYGON_OFFSET_MITRE_LIMIT: f64 = 2.0;

/// Distances (mm) the building must keep from each side of the lot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setbacks {
    pub front: f64,
    pub rear: f64,
    pub left: f64,
    pub right: f64,
}

impl Setbacks {
    #[must_use]
    pub fn new(front: f64, rear: f64, left: f64, right: f64) -> Self {
        Self {
            front,
            rear,
            left,
            right,
        }
    }

    /// The smallest of the four distances.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.front.min(self.rear).min(self.left).min(self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LotGeometry {
    boundary: Polygon,
    setback_polygon: Option<Polygon>,
    north_angle: f64,
    setbacks: Setbacks,
}

impl LotGeometry {
    /// Validates raw boundary vertices and builds the lot from them.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Rejected` when the vertices do not form a
    /// usable polygon.
    pub fn from_vertices(
        vertices: &[Point2],
        setbacks: Setbacks,
        north_angle: f64,
        close_tolerance: f64,
    ) -> Result<Self> {
        let boundary = ValidatePolygon::new(vertices.to_vec())
            .close_tolerance(close_tolerance)
            .execute()
            .into_polygon()?;
        Ok(build_lot_geometry(boundary, setbacks, north_angle))
    }

    #[must_use]
    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    /// Buildable envelope; `None` without a positive setback or when the
    /// setback consumes the lot.
    #[must_use]
    pub fn setback_polygon(&self) -> Option<&Polygon> {
        self.setback_polygon.as_ref()
    }

    #[must_use]
    pub fn north_angle(&self) -> f64 {
        self.north_angle
    }

    #[must_use]
    pub fn setbacks(&self) -> Setbacks {
        self.setbacks
    }

    #[must_use]
    pub fn area_mm2(&self) -> f64 {
        self.boundary.area()
    }

    #[must_use]
    pub fn area_sq_m(&self) -> f64 {
        area_mm2_to_m2(self.area_mm2())
    }
}

/// Builds lot geometry from a validated boundary.
///
/// The envelope is a single mitre-joined inward offset by the smallest of
/// the four setbacks; the sides are not offset independently. When the
/// offset does not leave exactly one polygon the envelope is dropped.
#[must_use]
pub fn build_lot_geometry(boundary: Polygon, setbacks: Setbacks, north_angle: f64) -> LotGeometry {
    let boundary = boundary.oriented();
    let inset = setbacks.min();
    let setback_polygon = if inset > 0.0 {
        let mut pieces = offset_polygon(&boundary, -inset, MITRE_LIMIT).into_inner();
        if pieces.len() == 1 {
            pieces.pop()
        } else {
            warn!(
                inset,
                pieces = pieces.len(),
                "setback does not leave a single envelope, dropping it"
            );
            None
        }
    } else {
        None
    };
    LotGeometry {
        boundary,
        setback_polygon,
        north_angle,
        setbacks,
    }
}

/// Mitre-joined inward offset; `None` when the polygon collapses.
#[must_use]
pub fn offset_polygon_inward(polygon: &Polygon, distance: f64) -> Option<MultiPolygon> {
    let result = offset_polygon(polygon, -distance.abs(), POLYGON_OFFSET_MITRE_LIMIT);
    (!result.is_empty()).then_some(result)
}

/// Mitre-joined outward offset.
#[must_use]
pub fn offset_polygon_outward(polygon: &Polygon, distance: f64) -> MultiPolygon {
    offset_polygon(polygon, distance.abs(), POLYGON_OFFSET_MITRE_LIMIT)
}
