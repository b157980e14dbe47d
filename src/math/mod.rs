pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type. All coordinates are millimetres.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for treating two coordinates as the same point.
pub const POINT_EPS: f64 = 1e-9;

/// Returns `true` if both coordinates of `a` and `b` differ by less than [`POINT_EPS`].
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    (a.x - b.x).abs() < POINT_EPS && (a.y - b.y).abs() < POINT_EPS
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Converts a `[x, y]` pair into a point.
#[must_use]
pub fn pt(p: [f64; 2]) -> Point2 {
    Point2::new(p[0], p[1])
}
