use tracing::warn;

use crate::geometry::LineSegment;
use crate::math::distance;

use super::{GeometryIssue, IssueCode};

/// Gaps below this (mm) already count as closed.
const CLOSED_GAP: f64 = 0.01;

/// Closes an almost-closed chain of wall centerlines.
///
/// The chain is closed when the end of the last segment meets the start of
/// the first. A gap up to `tolerance` is snapped by moving the last
/// endpoint; a wider gap gets a new closing segment. Chains with fewer than
/// two segments are returned unchanged.
#[must_use]
pub fn auto_close_wall_chain(
    segments: &[LineSegment],
    tolerance: f64,
) -> (Vec<LineSegment>, Vec<GeometryIssue>) {
    let mut issues = Vec::new();
    let mut fixed = segments.to_vec();
    if segments.len() < 2 {
        return (fixed, issues);
    }
    let first_start = segments[0].start;
    let last_end = segments[segments.len() - 1].end;
    let gap = distance(&first_start, &last_end);

    if gap < CLOSED_GAP {
        return (fixed, issues);
    }

    if gap <= tolerance {
        if let Some(last) = fixed.last_mut() {
            last.end = first_start;
        }
        warn!(gap, "snapped wall chain closed");
        issues.push(
            GeometryIssue::warning(
                IssueCode::ChainSnapped,
                format!("snapped last wall endpoint to close {gap:.2}mm gap"),
            )
            .at(&last_end),
        );
    } else {
        fixed.push(LineSegment::new(last_end, first_start));
        warn!(gap, "added closing wall segment");
        issues.push(
            GeometryIssue::warning(
                IssueCode::ChainAutoClosed,
                format!("added closing wall segment to bridge {gap:.1}mm gap"),
            )
            .at(&last_end),
        );
    }
    (fixed, issues)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn seg(a: (f64, f64), b: (f64, f64)) -> LineSegment {
        LineSegment::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))
    }

    fn u_chain(end_y: f64) -> Vec<LineSegment> {
        vec![
            seg((0.0, 0.0), (5000.0, 0.0)),
            seg((5000.0, 0.0), (5000.0, 4000.0)),
            seg((5000.0, 4000.0), (0.0, 4000.0)),
            seg((0.0, 4000.0), (0.0, end_y)),
        ]
    }

    #[test]
    fn closed_chain_is_untouched() {
        let (fixed, issues) = auto_close_wall_chain(&u_chain(0.0), 5.0);
        assert_eq!(fixed.len(), 4);
        assert!(issues.is_empty());
    }

    #[test]
    fn small_gap_moves_last_endpoint() {
        let (fixed, issues) = auto_close_wall_chain(&u_chain(3.0), 5.0);
        assert_eq!(fixed.len(), 4);
        assert_eq!(fixed[3].end, Point2::new(0.0, 0.0));
        assert_eq!(issues[0].code, IssueCode::ChainSnapped);
    }

    #[test]
    fn wide_gap_adds_segment() {
        let chain = u_chain(4000.0);
        let (fixed, issues) = auto_close_wall_chain(&chain[..3], 5.0);
        assert_eq!(fixed.len(), 4);
        assert_eq!(fixed[3], seg((0.0, 4000.0), (0.0, 0.0)));
        assert_eq!(issues[0].code, IssueCode::ChainAutoClosed);
    }

    #[test]
    fn single_segment_is_left_alone() {
        let (fixed, issues) = auto_close_wall_chain(&[seg((0.0, 0.0), (1.0, 0.0))], 5.0);
        assert_eq!(fixed.len(), 1);
        assert!(issues.is_empty());
    }
}
