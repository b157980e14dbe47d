use serde::Serialize;

use crate::geometry::{Bounds, Polygon};
use crate::math::Point2;
use crate::units::{area_mm2_to_ft2, area_mm2_to_m2};

/// An enclosed region bounded by walls, taken from a hole of the merged
/// wall mass. The polygon is always counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    name: String,
    polygon: Polygon,
    color: Option<String>,
}

/// Width and height of a room's bounding box (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Room {
    pub(crate) fn new(name: impl Into<String>, polygon: Polygon, color: Option<String>) -> Self {
        Self {
            name: name.into(),
            polygon: polygon.oriented(),
            color,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub fn area_mm2(&self) -> f64 {
        self.polygon.area()
    }

    #[must_use]
    pub fn area_sq_m(&self) -> f64 {
        area_mm2_to_m2(self.area_mm2())
    }

    #[must_use]
    pub fn area_sq_ft(&self) -> f64 {
        area_mm2_to_ft2(self.area_mm2())
    }

    /// Area centroid, or an interior point when the centroid falls outside
    /// a non-convex room. Suitable for label placement.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        let c = self.polygon.centroid();
        if self.polygon.contains(&c) {
            c
        } else {
            self.polygon.representative_point()
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.polygon.bounds()
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        let b = self.bounds();
        Dimensions {
            width: b.width(),
            height: b.height(),
        }
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.polygon.perimeter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rectangular_room_metrics() {
        let room = Room::new("Living", Polygon::rect(0.0, 0.0, 5000.0, 4000.0), None);
        assert_eq!(room.name(), "Living");
        assert_relative_eq!(room.area_mm2(), 20_000_000.0);
        assert_relative_eq!(room.area_sq_m(), 20.0);
        assert_relative_eq!(room.area_sq_ft(), 20_000_000.0 / (304.8 * 304.8));
        assert_relative_eq!(room.perimeter(), 18_000.0);
        let c = room.centroid();
        assert_relative_eq!(c.x, 2500.0);
        assert_relative_eq!(c.y, 2000.0);
        let d = room.dimensions();
        assert_relative_eq!(d.width, 5000.0);
        assert_relative_eq!(d.height, 4000.0);
    }

    #[test]
    fn clockwise_input_is_reoriented() {
        let cw = Polygon::rect(0.0, 0.0, 10.0, 10.0).reversed();
        let room = Room::new("R", cw, Some("#ffcc00".into()));
        assert!(room.polygon().is_ccw());
        assert_eq!(room.color(), Some("#ffcc00"));
    }

    #[test]
    fn u_shaped_room_centroid_stays_inside() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3000.0, 0.0),
            Point2::new(3000.0, 3000.0),
            Point2::new(2000.0, 3000.0),
            Point2::new(2000.0, 500.0),
            Point2::new(1000.0, 500.0),
            Point2::new(1000.0, 3000.0),
            Point2::new(0.0, 3000.0),
        ];
        let room = Room::new("U", Polygon::from_ring(ring).unwrap(), None);
        let raw = room.polygon().centroid();
        assert!(!room.polygon().contains(&raw));
        assert!(room.polygon().contains(&room.centroid()));
    }
}
