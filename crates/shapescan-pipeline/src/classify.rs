//! Shape classification: map a simplified contour's vertex count and the
//! raw contour's circularity to a shape category.
//!
//! The decision rule is a fixed priority chain, circularity first. The
//! constants are empirically tuned decision boundaries; reproducing the
//! same labels on the same inputs requires reproducing them exactly.

use crate::types::{Contour, ShapeKind};

/// Circularity above which a contour is a circle regardless of vertex
/// count.
pub const CIRCLE_CIRCULARITY_GATE: f64 = 0.75;

/// Circularity above which a 6- or 7-vertex polygon reads as a rounded
/// circle rather than a pentagon.
pub const ROUNDED_POLYGON_GATE: f64 = 0.65;

/// Maximum distance between a simplified contour's first and last points
/// for them to count as one vertex.
pub const CLOSING_POINT_TOLERANCE: f64 = 2.0;

/// Count the vertices of a simplified contour.
///
/// A closed boundary walk ends one cell away from where it began, so the
/// simplified contour usually carries a near-duplicate closing point;
/// when the first and last points are within
/// [`CLOSING_POINT_TOLERANCE`], they count once.
#[must_use]
pub fn vertex_count(simplified: &Contour) -> usize {
    let points = simplified.points();
    if let (Some(&first), Some(&last)) = (points.first(), points.last())
        && points.len() > 1
        && first.distance(last) < CLOSING_POINT_TOLERANCE
    {
        return points.len() - 1;
    }
    points.len()
}

/// Classify a contour by vertex count and circularity.
///
/// Rules are evaluated in priority order:
///
/// 1. Circularity above [`CIRCLE_CIRCULARITY_GATE`] is a circle, full stop.
/// 2. 3, 4, and 5 vertices are triangle, rectangle, and pentagon.
/// 3. 10-12 vertices are a star (5 points + 5 notches, give or take the
///    closing artifacts).
/// 4. Any other count of 8 or more reads as a many-sided circle
///    approximation.
/// 5. 6 or 7 vertices are a rounded circle above
///    [`ROUNDED_POLYGON_GATE`], otherwise a pentagon with a split corner.
///
/// Returns `None` (no shape) for vertex counts below 3.
#[must_use]
pub fn classify(vertex_count: usize, circularity: f64) -> Option<ShapeKind> {
    if circularity > CIRCLE_CIRCULARITY_GATE {
        return Some(ShapeKind::Circle);
    }

    match vertex_count {
        3 => Some(ShapeKind::Triangle),
        4 => Some(ShapeKind::Rectangle),
        5 => Some(ShapeKind::Pentagon),
        10..=12 => Some(ShapeKind::Star),
        v if v >= 8 => Some(ShapeKind::Circle),
        6 | 7 => {
            if circularity > ROUNDED_POLYGON_GATE {
                Some(ShapeKind::Circle)
            } else {
                Some(ShapeKind::Pentagon)
            }
        }
        _ => None,
    }
}
