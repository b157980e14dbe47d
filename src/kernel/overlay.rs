use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::geometry::{MultiPolygon, Polygon};
use crate::math::polygon_2d::{ensure_ccw, ensure_cw, signed_area, winding_number};
use crate::math::Point2;

use super::SLIVER_AREA;

type Path = Vec<[f64; 2]>;

/// Converts a ring to overlay path format.
fn ring_to_path(ring: &[Point2]) -> Path {
    ring.iter().map(|p| [p.x, p.y]).collect()
}

/// Converts polygons to overlay paths: exteriors counter-clockwise, holes
/// clockwise, so that non-zero filling respects holes.
fn polygons_to_paths<'a>(polygons: impl IntoIterator<Item = &'a Polygon>) -> Vec<Path> {
    let mut paths = Vec::new();
    for polygon in polygons {
        paths.push(ring_to_path(&ensure_ccw(polygon.exterior())));
        for hole in polygon.interiors() {
            paths.push(ring_to_path(&ensure_cw(hole)));
        }
    }
    paths
}

/// Converts overlay output back into polygons.
///
/// The overlay returns a list of shapes; each shape lists its outer contour
/// first and its holes after.
fn shapes_to_multipolygon(shapes: Vec<Vec<Path>>) -> MultiPolygon {
    let mut polygons = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let mut contours = shape.into_iter().map(|contour| {
            contour
                .into_iter()
                .map(|[x, y]| Point2::new(x, y))
                .collect::<Vec<_>>()
        });
        let Some(outer) = contours.next() else {
            continue;
        };
        if outer.len() < 3 || signed_area(&outer).abs() < SLIVER_AREA {
            continue;
        }
        let holes = contours
            .filter(|h| h.len() >= 3 && signed_area(h).abs() >= SLIVER_AREA)
            .map(|h| ensure_cw(&h))
            .collect();
        polygons.push(Polygon::from_parts(ensure_ccw(&outer), holes));
    }
    MultiPolygon::new(polygons)
}

fn run(subject: &[Path], clip: &[Path], rule: OverlayRule, fill: FillRule) -> MultiPolygon {
    if subject.is_empty() && clip.is_empty() {
        return MultiPolygon::empty();
    }
    let subject = subject.to_vec();
    let clip = clip.to_vec();
    shapes_to_multipolygon(subject.overlay(&clip, rule, fill))
}

/// Unions any number of polygons in a single overlay pass.
#[must_use]
pub fn union_all<'a>(polygons: impl IntoIterator<Item = &'a Polygon>) -> MultiPolygon {
    let subject = polygons_to_paths(polygons);
    run(&subject, &[], OverlayRule::Union, FillRule::NonZero)
}

/// Unions raw rings of any orientation; each ring is treated as filled.
#[must_use]
pub fn union_rings(rings: &[Vec<Point2>]) -> MultiPolygon {
    let subject: Vec<Path> = rings
        .iter()
        .filter(|r| r.len() >= 3)
        .map(|r| ring_to_path(&ensure_ccw(r)))
        .collect();
    run(&subject, &[], OverlayRule::Union, FillRule::NonZero)
}

/// Area of `subject` not covered by `clip`.
#[must_use]
pub fn difference(subject: &MultiPolygon, clip: &MultiPolygon) -> MultiPolygon {
    if clip.is_empty() {
        return subject.clone();
    }
    run(
        &polygons_to_paths(subject),
        &polygons_to_paths(clip),
        OverlayRule::Difference,
        FillRule::NonZero,
    )
}

/// Area covered by both inputs.
#[must_use]
pub fn intersection(a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    if a.is_empty() || b.is_empty() {
        return MultiPolygon::empty();
    }
    run(
        &polygons_to_paths(a),
        &polygons_to_paths(b),
        OverlayRule::Intersect,
        FillRule::NonZero,
    )
}

/// Rebuilds a possibly self-intersecting ring as valid polygons.
///
/// Uses even-odd filling, so a bowtie becomes its two triangles and a
/// fold-back spike collapses away.
#[must_use]
pub fn make_valid(ring: &[Point2]) -> MultiPolygon {
    if ring.len() < 3 {
        return MultiPolygon::empty();
    }
    run(
        &[ring_to_path(ring)],
        &[],
        OverlayRule::Subject,
        FillRule::EvenOdd,
    )
}

/// Fills a ring by winding number, keeping only counter-clockwise wound
/// regions.
pub(super) fn positive_fill(ring: &[Point2]) -> MultiPolygon {
    if ring.len() < 3 {
        return MultiPolygon::empty();
    }
    // Regions with winding +1 and -1 never share an edge, so every non-zero
    // piece has a single sign.
    let pieces = run(
        &[ring_to_path(ring)],
        &[],
        OverlayRule::Subject,
        FillRule::NonZero,
    );
    MultiPolygon::new(
        pieces
            .into_inner()
            .into_iter()
            .filter(|piece| winding_number(&piece.representative_point(), ring) > 0)
            .collect(),
    )
}
