use tracing::warn;

use crate::geometry::Polygon;
use crate::kernel;
use crate::math::intersect_2d::ring_self_intersection;
use crate::math::{distance, points_equal, Point2};

use super::coords::{dedup_consecutive, validate_coordinates};
use super::{has_errors, GeometryIssue, IssueCode, ValidationResult};

/// Default gap (mm) below which an unclosed ring is snapped shut.
pub const DEFAULT_CLOSE_TOLERANCE: f64 = 5.0;

/// Polygons below this area (mm²) are rejected.
const MIN_AREA: f64 = 1.0;

/// Ensures the ring repeats its first point at the end.
///
/// Already closed rings are returned untouched. A gap up to `tolerance` is
/// closed by moving the last point onto the first; a wider gap gets the
/// first point appended.
#[must_use]
pub fn auto_close_ring(coords: &[Point2], tolerance: f64) -> (Vec<Point2>, Vec<GeometryIssue>) {
    let mut issues = Vec::new();
    let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
        return (coords.to_vec(), issues);
    };
    if coords.len() < 3 || points_equal(first, last) {
        return (coords.to_vec(), issues);
    }

    let gap = distance(first, last);
    let mut closed = coords.to_vec();
    if gap <= tolerance {
        if let Some(end) = closed.last_mut() {
            *end = *first;
        }
        warn!(gap, "snapped ring closed");
        issues.push(
            GeometryIssue::warning(
                IssueCode::SnappedClosed,
                format!("snapped last point to first (gap was {gap:.2}mm)"),
            )
            .at(last),
        );
    } else {
        closed.push(*first);
        warn!(gap, "appended closing vertex to ring");
        issues.push(
            GeometryIssue::warning(
                IssueCode::AutoClosed,
                format!("appended closing segment ({gap:.1}mm gap between first and last point)"),
            )
            .at(last),
        );
    }
    (closed, issues)
}

/// Full validation and repair of a polygon vertex ring.
///
/// Produces a closed, counter-clockwise, simple polygon with positive area,
/// or no polygon and the blocking issues.
#[derive(Debug, Clone)]
pub struct ValidatePolygon {
    coords: Vec<Point2>,
    auto_fix: bool,
    close_tolerance: f64,
}

impl ValidatePolygon {
    /// Creates a validation pass with auto-fix on and the default closing
    /// tolerance.
    #[must_use]
    pub fn new(coords: Vec<Point2>) -> Self {
        Self {
            coords,
            auto_fix: true,
            close_tolerance: DEFAULT_CLOSE_TOLERANCE,
        }
    }

    /// When disabled, invalid geometry is rejected instead of repaired.
    #[must_use]
    pub fn auto_fix(mut self, auto_fix: bool) -> Self {
        self.auto_fix = auto_fix;
        self
    }

    #[must_use]
    pub fn close_tolerance(mut self, tolerance: f64) -> Self {
        self.close_tolerance = tolerance;
        self
    }

    /// Runs the pipeline. Never fails; blocking problems are reported as
    /// error issues with no polygon.
    #[must_use]
    pub fn execute(&self) -> ValidationResult {
        let mut issues = validate_coordinates(&self.coords);
        if has_errors(&issues) {
            return rejected(issues);
        }

        let clean = dedup_consecutive(&self.coords);
        let (closed, close_issues) = auto_close_ring(&clean, self.close_tolerance);
        issues.extend(close_issues);

        let mut open = dedup_consecutive(&closed);
        if open.len() > 1 && points_equal(&open[0], &open[open.len() - 1]) {
            open.pop();
        }
        let mut polygon = match Polygon::from_ring(open) {
            Ok(p) => p,
            Err(e) => {
                issues.push(GeometryIssue::error(
                    IssueCode::ConstructionFailed,
                    format!("could not construct polygon: {e}"),
                ));
                return rejected(issues);
            }
        };

        if let Some(hit) = ring_self_intersection(polygon.exterior()) {
            let message = format!("self-intersection at ({:.3}, {:.3})", hit.x, hit.y);
            if !self.auto_fix {
                issues.push(GeometryIssue::error(IssueCode::InvalidGeometry, message).at(&hit));
                return rejected(issues);
            }
            issues.push(GeometryIssue::warning(IssueCode::InvalidGeometry, message).at(&hit));

            let repaired = kernel::make_valid(polygon.exterior());
            let pieces = repaired.len();
            let Some(largest) = repaired.largest().cloned() else {
                issues.push(GeometryIssue::error(
                    IssueCode::ZeroArea,
                    "repair left no polygon with positive area",
                ));
                return rejected(issues);
            };
            warn!(pieces, "repaired self-intersecting polygon");
            polygon = largest;
            issues.push(GeometryIssue::info(
                IssueCode::AutoRepaired,
                if pieces > 1 {
                    format!("polygon was repaired; kept the largest of {pieces} pieces")
                } else {
                    "polygon was repaired".to_owned()
                },
            ));
        }

        if !polygon.is_ccw() {
            issues.push(GeometryIssue::warning(
                IssueCode::CwOrientation,
                "ring was clockwise, reversed to counter-clockwise",
            ));
            polygon = polygon.reversed();
        }

        let area = polygon.area();
        if area < MIN_AREA {
            issues.push(GeometryIssue::error(
                IssueCode::ZeroArea,
                format!("polygon has negligible area ({area:.4} mm²)"),
            ));
            return rejected(issues);
        }

        ValidationResult {
            polygon: Some(polygon),
            issues,
        }
    }
}

fn rejected(issues: Vec<GeometryIssue>) -> ValidationResult {
    ValidationResult {
        polygon: None,
        issues,
    }
}

/// Shorthand for [`ValidatePolygon`].
#[must_use]
pub fn validate_polygon(coords: &[Point2], auto_fix: bool, close_tolerance: f64) -> ValidationResult {
    ValidatePolygon::new(coords.to_vec())
        .auto_fix(auto_fix)
        .close_tolerance(close_tolerance)
        .execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn open_square() -> Vec<Point2> {
        pts(&[(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0), (0.0, 1000.0)])
    }

    #[test]
    fn already_closed_ring_is_unchanged() {
        let mut ring = open_square();
        ring.push(ring[0]);
        let (closed, issues) = auto_close_ring(&ring, 5.0);
        assert_eq!(closed, ring);
        assert!(issues.is_empty());
    }

    #[test]
    fn tiny_gap_snaps() {
        let mut ring = open_square();
        ring.push(Point2::new(0.1, 0.0));
        let (closed, issues) = auto_close_ring(&ring, 5.0);
        assert_eq!(closed.len(), ring.len());
        assert_eq!(closed.last(), closed.first());
        assert_eq!(issues[0].code, IssueCode::SnappedClosed);
    }

    #[test]
    fn gap_exactly_at_tolerance_snaps() {
        let mut ring = open_square();
        ring.push(Point2::new(0.0, 5.0));
        let (closed, issues) = auto_close_ring(&ring, 5.0);
        assert_eq!(closed.len(), ring.len());
        assert_eq!(issues[0].code, IssueCode::SnappedClosed);
    }

    #[test]
    fn wide_gap_appends() {
        let mut ring = open_square();
        ring.push(Point2::new(0.0, 50.0));
        let (closed, issues) = auto_close_ring(&ring, 5.0);
        assert_eq!(closed.len(), ring.len() + 1);
        assert_eq!(issues[0].code, IssueCode::AutoClosed);
        assert_eq!(issues[0].location, Some([0.0, 50.0]));
    }

    #[test]
    fn valid_closed_ccw_polygon_round_trips() {
        let mut ring = open_square();
        ring.push(ring[0]);
        let result = validate_polygon(&ring, true, 5.0);
        assert!(result.valid());
        assert!(result.issues.is_empty());
        assert_eq!(result.polygon.unwrap().exterior(), open_square().as_slice());
    }

    #[test]
    fn repair_is_idempotent() {
        let mut ring = open_square();
        ring.push(ring[0]);
        let first = validate_polygon(&ring, true, 5.0).polygon.unwrap();
        let second = validate_polygon(&first.closed_exterior(), true, 5.0)
            .polygon
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn clockwise_ring_is_reversed() {
        let ring: Vec<Point2> = open_square().into_iter().rev().collect();
        let result = validate_polygon(&ring, true, 5.0);
        assert!(result.has(IssueCode::CwOrientation));
        assert!(result.has(IssueCode::AutoClosed));
        assert!(result.polygon.unwrap().is_ccw());
    }

    #[test]
    fn bowtie_is_repaired_when_auto_fix_is_on() {
        let bowtie = pts(&[(0.0, 0.0), (1000.0, 1000.0), (1000.0, 0.0), (0.0, 1000.0)]);
        let result = validate_polygon(&bowtie, true, 5.0);
        assert!(result.valid());
        assert!(result.has(IssueCode::InvalidGeometry));
        assert!(result.has(IssueCode::AutoRepaired));
        let polygon = result.polygon.unwrap();
        assert!(polygon.is_ccw());
        assert_abs_diff_eq!(polygon.area(), 250_000.0, epsilon = 1e-3);
        assert!(ring_self_intersection(polygon.exterior()).is_none());
    }

    #[test]
    fn bowtie_is_rejected_without_auto_fix() {
        let bowtie = pts(&[(0.0, 0.0), (1000.0, 1000.0), (1000.0, 0.0), (0.0, 1000.0)]);
        let result = validate_polygon(&bowtie, false, 5.0);
        assert!(!result.valid());
        assert!(result.polygon.is_none());
        assert!(result.errors().any(|i| i.code == IssueCode::InvalidGeometry));
        assert!(result.into_polygon().is_err());
    }

    #[test]
    fn snapping_a_triangle_to_two_points_fails_construction() {
        let ring = pts(&[(0.0, 0.0), (1000.0, 0.0), (0.0, 1.0)]);
        let result = validate_polygon(&ring, true, 5.0);
        assert!(result.has(IssueCode::ConstructionFailed));
        assert!(result.polygon.is_none());
    }

    #[test]
    fn sliver_is_rejected_as_zero_area() {
        let ring = pts(&[(0.0, 0.0), (1000.0, 0.0), (1000.0, 0.0005), (0.0, 0.0005)]);
        let result = validate_polygon(&ring, true, 0.0001);
        assert!(result.has(IssueCode::ZeroArea));
    }
}
