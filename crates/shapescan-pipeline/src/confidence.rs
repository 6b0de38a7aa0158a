//! Per-category confidence scoring.
//!
//! Each shape category has an independent scoring function: a base
//! confidence tiered or demoted by how well the measured geometry fits
//! the category, then multiplicative penalties for contradictory
//! circularity and for short contours whose measurements are noisy.
//! The result is clamped to `[0, 1]`.
//!
//! Like the classifier boundaries, these constants are tuned decision
//! values; output parity requires reproducing them exactly.

use crate::types::{BoundingBox, ShapeKind};

/// Score how confidently the measured geometry supports `kind`.
///
/// `vertex_count` and `circularity` are the same values the classifier
/// consumed; `contour_points` is the raw boundary walk length. The
/// bounding box contributes its aspect ratio (circles should be round).
#[must_use]
pub fn score(
    kind: ShapeKind,
    vertex_count: usize,
    circularity: f64,
    contour_points: usize,
    bounding_box: &BoundingBox,
) -> f64 {
    let aspect = normalized_aspect_ratio(bounding_box);
    let raw = match kind {
        ShapeKind::Circle => circle_confidence(circularity, aspect, contour_points),
        ShapeKind::Triangle => triangle_confidence(vertex_count, circularity, contour_points),
        ShapeKind::Rectangle => rectangle_confidence(vertex_count, circularity, contour_points),
        ShapeKind::Pentagon => pentagon_confidence(vertex_count, circularity, contour_points),
        ShapeKind::Star => star_confidence(vertex_count, circularity, contour_points),
    };
    raw.clamp(0.0, 1.0)
}

/// `min(w/h, h/w)`: 1.0 for a square box, approaching 0 as it elongates.
fn normalized_aspect_ratio(bounding_box: &BoundingBox) -> f64 {
    if bounding_box.width == 0 || bounding_box.height == 0 {
        return 0.0;
    }
    let w = f64::from(bounding_box.width);
    let h = f64::from(bounding_box.height);
    (w / h).min(h / w)
}

fn circle_confidence(circularity: f64, aspect: f64, contour_points: usize) -> f64 {
    let mut confidence = if circularity > 0.85 {
        0.95
    } else if circularity > 0.75 {
        0.85
    } else if circularity > 0.65 {
        0.7
    } else {
        0.5
    };

    // Elongated bounding boxes are not circles.
    confidence -= (1.0 - aspect) * 0.2;

    if contour_points < 50 {
        confidence *= 0.8;
    }
    confidence
}

fn triangle_confidence(vertex_count: usize, circularity: f64, contour_points: usize) -> f64 {
    let mut confidence: f64 = if vertex_count == 3 { 0.9 } else { 0.5 };

    if circularity < 0.5 {
        confidence = confidence.min(0.95);
    }
    // A round triangle is suspect.
    if circularity > 0.7 {
        confidence *= 0.7;
    }
    if contour_points < 30 {
        confidence *= 0.8;
    }
    confidence
}

fn rectangle_confidence(vertex_count: usize, circularity: f64, contour_points: usize) -> f64 {
    let mut confidence: f64 = if vertex_count == 4 { 0.9 } else { 0.5 };

    if circularity < 0.7 {
        confidence = confidence.min(0.95);
    }
    if circularity > 0.8 {
        confidence *= 0.6;
    }
    if contour_points < 40 {
        confidence *= 0.8;
    }
    confidence
}

fn pentagon_confidence(vertex_count: usize, circularity: f64, contour_points: usize) -> f64 {
    let mut confidence: f64 = if vertex_count == 5 { 0.85 } else { 0.5 };

    if (0.6..=0.8).contains(&circularity) {
        confidence = confidence.min(0.9);
    }
    if circularity > 0.8 || circularity < 0.4 {
        confidence *= 0.7;
    }
    if contour_points < 50 {
        confidence *= 0.8;
    }
    confidence
}

fn star_confidence(vertex_count: usize, circularity: f64, contour_points: usize) -> f64 {
    let mut confidence: f64 = if (10..=12).contains(&vertex_count) {
        0.85
    } else if (8..=14).contains(&vertex_count) {
        0.75
    } else {
        0.6
    };

    // Stars are spiky: low circularity corroborates, high contradicts.
    if circularity < 0.5 {
        confidence = (confidence + 0.1).min(0.95);
    }
    if circularity > 0.65 {
        confidence *= 0.6;
    }
    if contour_points < 60 {
        confidence *= 0.8;
    }
    confidence
}
