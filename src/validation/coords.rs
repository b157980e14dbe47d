use crate::math::polygon_2d::all_collinear;
use crate::math::{distance, points_equal, Point2};

use super::{GeometryIssue, IssueCode};

/// Edges shorter than this (mm) are reported as micro edges.
const MICRO_EDGE_LENGTH: f64 = 1.0;

/// Removes consecutive repeated points.
#[must_use]
pub fn dedup_consecutive(coords: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(coords.len());
    for p in coords {
        match out.last() {
            Some(last) if points_equal(last, p) => {}
            _ => out.push(*p),
        }
    }
    out
}

/// One blocking `NON_FINITE_COORD` issue per point with a NaN or infinite
/// coordinate, naming each as `"{what} {index}"`.
#[must_use]
pub fn non_finite_points(coords: &[Point2], what: &str) -> Vec<GeometryIssue> {
    coords
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
        .map(|(i, p)| {
            let location = Point2::new(
                if p.x.is_finite() { p.x } else { 0.0 },
                if p.y.is_finite() { p.y } else { 0.0 },
            );
            GeometryIssue::error(
                IssueCode::NonFiniteCoord,
                format!("{what} {i} has non-finite coordinate ({}, {})", p.x, p.y),
            )
            .at(&location)
        })
        .collect()
}

/// Checks a raw coordinate list before any polygon is built.
///
/// Non-finite coordinates are reported for every offending point and then
/// end the check: the remaining tests are meaningless on NaN input.
#[must_use]
pub fn validate_coordinates(coords: &[Point2]) -> Vec<GeometryIssue> {
    let mut issues = Vec::new();

    if coords.len() < 3 {
        issues.push(GeometryIssue::error(
            IssueCode::TooFewPoints,
            format!("need at least 3 points for a polygon, got {}", coords.len()),
        ));
        return issues;
    }

    let non_finite = non_finite_points(coords, "point");
    if !non_finite.is_empty() {
        return non_finite;
    }

    for (i, pair) in coords.windows(2).enumerate() {
        if points_equal(&pair[0], &pair[1]) {
            issues.push(
                GeometryIssue::warning(
                    IssueCode::ConsecutiveDuplicate,
                    format!(
                        "points {i} and {} are identical at ({}, {})",
                        i + 1,
                        pair[0].x,
                        pair[0].y
                    ),
                )
                .at(&pair[0]),
            );
        }
    }

    let unique = dedup_consecutive(coords);
    if unique.len() < 3 {
        issues.push(GeometryIssue::error(
            IssueCode::DegenerateAfterDedup,
            format!(
                "only {} unique consecutive points, cannot form a polygon",
                unique.len()
            ),
        ));
    } else if all_collinear(&unique) {
        issues.push(GeometryIssue::error(
            IssueCode::AllCollinear,
            "all points are collinear, polygon would have zero area",
        ));
    }

    for (i, pair) in coords.windows(2).enumerate() {
        let d = distance(&pair[0], &pair[1]);
        if d > 0.0 && d < MICRO_EDGE_LENGTH {
            issues.push(
                GeometryIssue::warning(
                    IssueCode::MicroEdge,
                    format!("edge {i}-{} is only {d:.3}mm long", i + 1),
                )
                .at(&pair[0]),
            );
        }
    }

    issues
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn codes(issues: &[GeometryIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn too_few_points() {
        let issues = validate_coordinates(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert_eq!(codes(&issues), vec![IssueCode::TooFewPoints]);
        assert!(issues[0].is_error());
    }

    #[test]
    fn nan_aborts_after_reporting_every_bad_point() {
        let issues = validate_coordinates(&[
            Point2::new(0.0, 0.0),
            Point2::new(f64::NAN, 0.0),
            Point2::new(0.0, f64::INFINITY),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(
            codes(&issues),
            vec![IssueCode::NonFiniteCoord, IssueCode::NonFiniteCoord]
        );
        assert_eq!(issues[0].location, Some([0.0, 0.0]));
    }

    #[test]
    fn duplicates_warn_and_collapse() {
        let issues = validate_coordinates(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        assert!(codes(&issues).contains(&IssueCode::ConsecutiveDuplicate));
        assert!(codes(&issues).contains(&IssueCode::DegenerateAfterDedup));
    }

    #[test]
    fn collinear_points_are_rejected() {
        let issues = validate_coordinates(&[
            Point2::new(0.0, 0.0),
            Point2::new(500.0, 0.0),
            Point2::new(1000.0, 0.0),
        ]);
        assert_eq!(codes(&issues), vec![IssueCode::AllCollinear]);
    }

    #[test]
    fn micro_edge_is_a_warning() {
        let issues = validate_coordinates(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(1000.0, 1000.0),
        ]);
        assert_eq!(codes(&issues), vec![IssueCode::MicroEdge]);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn dedup_keeps_order() {
        let out = dedup_consecutive(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(out.len(), 3);
    }
}
