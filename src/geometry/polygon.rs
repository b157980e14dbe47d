use crate::error::{GeometryError, Result};
use crate::math::distance_2d::point_to_ring_dist;
use crate::math::polygon_2d::{
    ensure_ccw, ensure_cw, point_in_ring, ring_centroid, ring_length, signed_area, Containment,
};
use crate::math::{points_equal, Point2};

/// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// The all-zero box reported for empty geometry.
    pub const ZERO: Self = Self {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Bounds of a point set, or `None` when empty.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Self>, p| {
            Some(match acc {
                None => Self {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

/// A planar polygon with an exterior ring and zero or more holes.
///
/// Rings are stored open: the closing vertex is implied and never repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<Point2>,
    interiors: Vec<Vec<Point2>>,
}

impl Polygon {
    /// Creates a polygon from open or closed rings.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN/infinite coordinates and
    /// `GeometryError::Degenerate` if any ring has fewer than 3 vertices.
    pub fn new(exterior: Vec<Point2>, interiors: Vec<Vec<Point2>>) -> Result<Self> {
        let exterior = open_ring(exterior)?;
        let interiors = interiors
            .into_iter()
            .map(open_ring)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            exterior,
            interiors,
        })
    }

    /// Creates a hole-free polygon from a single ring.
    ///
    /// # Errors
    ///
    /// See [`Polygon::new`].
    pub fn from_ring(ring: Vec<Point2>) -> Result<Self> {
        Self::new(ring, Vec::new())
    }

    /// Builds a polygon from rings already known to be well formed.
    pub(crate) fn from_parts(exterior: Vec<Point2>, interiors: Vec<Vec<Point2>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Axis-aligned rectangle.
    #[must_use]
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::from_parts(
            vec![
                Point2::new(min_x, min_y),
                Point2::new(max_x, min_y),
                Point2::new(max_x, max_y),
                Point2::new(min_x, max_y),
            ],
            Vec::new(),
        )
    }

    #[must_use]
    pub fn exterior(&self) -> &[Point2] {
        &self.exterior
    }

    #[must_use]
    pub fn interiors(&self) -> &[Vec<Point2>] {
        &self.interiors
    }

    /// The exterior ring with its first vertex repeated at the end.
    #[must_use]
    pub fn closed_exterior(&self) -> Vec<Point2> {
        let mut ring = self.exterior.clone();
        if let Some(first) = self.exterior.first() {
            ring.push(*first);
        }
        ring
    }

    /// Enclosed area: exterior minus holes.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|h| signed_area(h).abs()).sum();
        (signed_area(&self.exterior).abs() - holes).max(0.0)
    }

    /// Total boundary length, holes included.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        ring_length(&self.exterior) + self.interiors.iter().map(|h| ring_length(h)).sum::<f64>()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        signed_area(&self.exterior) > 0.0
    }

    /// Copy with a counter-clockwise exterior and clockwise holes.
    #[must_use]
    pub fn oriented(&self) -> Self {
        Self::from_parts(
            ensure_ccw(&self.exterior),
            self.interiors.iter().map(|h| ensure_cw(h)).collect(),
        )
    }

    /// Copy with the exterior walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::from_parts(
            self.exterior.iter().rev().copied().collect(),
            self.interiors.clone(),
        )
    }

    /// Drops the holes.
    #[must_use]
    pub fn without_holes(&self) -> Self {
        Self::from_parts(self.exterior.clone(), Vec::new())
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.exterior).unwrap_or(Bounds::ZERO)
    }

    /// Area centroid, holes subtracted.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        let outer_area = signed_area(&self.exterior).abs();
        let outer_c = ring_centroid(&self.exterior);
        if self.interiors.is_empty() {
            return outer_c;
        }
        let mut area = outer_area;
        let mut mx = outer_c.x * outer_area;
        let mut my = outer_c.y * outer_area;
        for hole in &self.interiors {
            let a = signed_area(hole).abs();
            let c = ring_centroid(hole);
            area -= a;
            mx -= c.x * a;
            my -= c.y * a;
        }
        if area.abs() < f64::EPSILON {
            outer_c
        } else {
            Point2::new(mx / area, my / area)
        }
    }

    /// Classifies a point against this polygon, holes included.
    #[must_use]
    pub fn locate(&self, p: &Point2) -> Containment {
        match point_in_ring(p, &self.exterior) {
            Containment::Outside => Containment::Outside,
            Containment::Boundary => Containment::Boundary,
            Containment::Inside => {
                for hole in &self.interiors {
                    match point_in_ring(p, hole) {
                        Containment::Inside => return Containment::Outside,
                        Containment::Boundary => return Containment::Boundary,
                        Containment::Outside => {}
                    }
                }
                Containment::Inside
            }
        }
    }

    /// Strict interior containment; boundary points are not contained.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        self.locate(p) == Containment::Inside
    }

    /// Interior or boundary containment.
    #[must_use]
    pub fn covers_point(&self, p: &Point2) -> bool {
        self.locate(p) != Containment::Outside
    }

    /// Distance from a point to the polygon; zero when covered.
    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        if self.covers_point(p) {
            return 0.0;
        }
        self.interiors
            .iter()
            .map(|h| point_to_ring_dist(p, h))
            .fold(point_to_ring_dist(p, &self.exterior), f64::min)
    }

    /// A point guaranteed to lie strictly inside the polygon.
    ///
    /// Scans the horizontal line through the middle of the bounds and takes
    /// the midpoint of the widest interior interval.
    #[must_use]
    pub fn representative_point(&self) -> Point2 {
        let b = self.bounds();
        let y = b.min_y + b.height() * 0.5;
        let mut xs: Vec<f64> = Vec::new();
        for ring in std::iter::once(&self.exterior).chain(self.interiors.iter()) {
            let n = ring.len();
            for i in 0..n {
                let a = ring[i];
                let c = ring[(i + 1) % n];
                if (a.y > y) != (c.y > y) {
                    xs.push(a.x + (y - a.y) * (c.x - a.x) / (c.y - a.y));
                }
            }
        }
        xs.sort_by(f64::total_cmp);
        xs.chunks_exact(2)
            .max_by(|l, r| (l[1] - l[0]).total_cmp(&(r[1] - r[0])))
            .map_or_else(|| self.centroid(), |pair| Point2::new((pair[0] + pair[1]) * 0.5, y))
    }
}

/// A set of disjoint polygons, such as a merged wall mass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    #[must_use]
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.0.iter()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.0.iter().map(Polygon::area).sum()
    }

    /// Bounds of all members, or [`Bounds::ZERO`] when empty.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.0
            .iter()
            .map(Polygon::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Bounds::ZERO)
    }

    /// Every hole of every member polygon.
    pub fn interiors(&self) -> impl Iterator<Item = &Vec<Point2>> {
        self.0.iter().flat_map(|p| p.interiors.iter())
    }

    /// The largest member by area.
    #[must_use]
    pub fn largest(&self) -> Option<&Polygon> {
        self.0.iter().max_by(|a, b| a.area().total_cmp(&b.area()))
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Polygon> {
        self.0
    }
}

impl<'a> IntoIterator for &'a MultiPolygon {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self(vec![polygon])
    }
}

/// Strips a repeated closing vertex and rejects unusable rings.
fn open_ring(mut ring: Vec<Point2>) -> Result<Vec<Point2>> {
    if let Some(bad) = ring.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::NonFinite { x: bad.x, y: bad.y }.into());
    }
    if ring.len() > 1 && points_equal(&ring[0], &ring[ring.len() - 1]) {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(GeometryError::Degenerate(format!(
            "a ring needs at least 3 distinct vertices, got {}",
            ring.len()
        ))
        .into());
    }
    Ok(ring)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn l_shape() -> Polygon {
        Polygon::from_ring(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4000.0, 0.0),
            Point2::new(4000.0, 1000.0),
            Point2::new(1000.0, 1000.0),
            Point2::new(1000.0, 4000.0),
            Point2::new(0.0, 4000.0),
        ])
        .unwrap()
    }

    #[test]
    fn closing_vertex_is_stripped() {
        let p = Polygon::from_ring(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(p.exterior().len(), 3);
        assert_eq!(p.closed_exterior().len(), 4);
    }

    #[test]
    fn two_point_ring_is_rejected() {
        let result = Polygon::from_ring(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn nan_ring_is_rejected() {
        let result = Polygon::from_ring(vec![
            Point2::new(0.0, 0.0),
            Point2::new(f64::NAN, 0.0),
            Point2::new(1.0, 1.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn area_subtracts_holes() {
        let hole = vec![
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 900.0),
            Point2::new(900.0, 900.0),
            Point2::new(900.0, 100.0),
        ];
        let outer = Polygon::rect(0.0, 0.0, 1000.0, 1000.0);
        let p = Polygon::new(outer.exterior().to_vec(), vec![hole]).unwrap();
        assert_relative_eq!(p.area(), 1_000_000.0 - 640_000.0);
        assert!(!p.contains(&Point2::new(500.0, 500.0)));
        assert!(p.contains(&Point2::new(50.0, 500.0)));
    }

    #[test]
    fn representative_point_inside_l_shape() {
        let l = l_shape();
        let rp = l.representative_point();
        assert!(l.contains(&rp), "rep point {rp:?} not inside");
    }

    #[test]
    fn bounds_of_empty_multipolygon_is_zero() {
        assert_eq!(MultiPolygon::empty().bounds(), Bounds::ZERO);
    }

    #[test]
    fn distance_to_outside_point() {
        let sq = Polygon::rect(0.0, 0.0, 10.0, 10.0);
        assert_relative_eq!(sq.distance_to_point(&Point2::new(13.0, 5.0)), 3.0);
        assert_relative_eq!(sq.distance_to_point(&Point2::new(5.0, 5.0)), 0.0);
    }
}
