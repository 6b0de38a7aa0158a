//! Polyline simplification using the Ramer-Douglas-Peucker algorithm.
//!
//! Reduces a boundary walk to its salient vertices: points within
//! `epsilon` of the chord between their segment endpoints are removed.
//! The detection pipeline scales `epsilon` with the raw contour length
//! (see [`DetectorConfig::simplify_ratio`](crate::DetectorConfig)), so
//! larger shapes tolerate proportionally larger simplification error.
//!
//! This sits between contour tracing and classification: the vertex
//! count of the simplified contour is what the classifier consumes.

use crate::geometry::point_segment_distance;
use crate::types::{Contour, Point};

/// Simplify a contour using the Ramer-Douglas-Peucker algorithm.
///
/// The first and last points are always preserved, along with every
/// intermediate point whose distance from the current segment's chord
/// exceeds `epsilon`. Contours with fewer than 3 points are returned
/// unchanged (nothing to simplify).
///
/// Pure, deterministic, and terminating: the recursion splits at a
/// strictly interior point, so depth is bounded by the input length.
#[must_use = "returns the simplified contour"]
pub fn simplify(contour: &Contour, epsilon: f64) -> Contour {
    let points = contour.points();
    if points.len() < 3 {
        return contour.clone();
    }

    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[points.len() - 1] = true;

    rdp_recurse(points, 0, points.len() - 1, epsilon, &mut kept);

    let simplified: Vec<Point> = points
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect();

    Contour::new(simplified)
}

/// Recursive step of the Ramer-Douglas-Peucker algorithm.
///
/// Finds the point between `start` and `end` farthest from the segment
/// between them. If that distance exceeds `epsilon`, the point is kept
/// and both sub-segments are processed recursively; otherwise the whole
/// span collapses to its endpoints.
fn rdp_recurse(points: &[Point], start: usize, end: usize, epsilon: f64, kept: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = start;

    for i in (start + 1)..end {
        let d = point_segment_distance(points[i], points[start], points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        kept[max_idx] = true;
        rdp_recurse(points, start, max_idx, epsilon, kept);
        rdp_recurse(points, max_idx, end, epsilon, kept);
    }
}
