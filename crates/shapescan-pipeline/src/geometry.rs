//! Geometry utilities: point-to-segment distance, shoelace area,
//! bounding boxes, and the derived shape properties.
//!
//! All properties are computed from the *raw* boundary walk, never the
//! simplified contour: simplification discards exactly the points that
//! make area and extent estimates accurate.

use std::f64::consts::PI;

use crate::types::{BoundingBox, Contour, Point};

/// Distance from point `p` to the line segment `a`-`b`.
///
/// The standard clamped point-to-segment distance: the closest point is
/// found by projecting `p` onto the segment and clamping the projection
/// parameter to `[0, 1]`. When `a` and `b` coincide, falls back to the
/// distance from `p` to `a`.
#[must_use]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let length_sq = a.distance_squared(b);
    if length_sq == 0.0 {
        // a and b are the same point.
        return p.distance(a);
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let t = (dx.mul_add(p.x - a.x, dy * (p.y - a.y)) / length_sq).clamp(0.0, 1.0);
    let closest = Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y));
    p.distance(closest)
}

/// Absolute polygon area via the shoelace formula.
///
/// The point sequence is taken as a closed polygon (last point connects
/// back to the first). Fewer than 3 points yield 0.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let signed: f64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x.mul_add(points[j].y, -(points[j].x * points[i].y))
        })
        .sum();
    (signed / 2.0).abs()
}

/// Integer bounding box over a point sequence, in inclusive pixel extents
/// (`width = max - min + 1`).
///
/// An empty sequence yields a zero-sized box at the origin.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bounding_box(points: &[Point]) -> BoundingBox {
    if points.is_empty() {
        return BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    }

    let mut min_x = f64::MAX;
    let mut max_x = f64::MIN;
    let mut min_y = f64::MAX;
    let mut max_y = f64::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    BoundingBox {
        x: min_x as i32,
        y: min_y as i32,
        width: (max_x - min_x) as u32 + 1,
        height: (max_y - min_y) as u32 + 1,
    }
}

/// Circularity: `4 * pi * area / perimeter^2`, with the raw contour point
/// count standing in for the perimeter.
///
/// On a pixel boundary walk each step advances roughly one pixel, so the
/// point count tracks arc length closely enough for classification. A
/// zero point count yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn circularity(area: f64, perimeter_points: usize) -> f64 {
    if perimeter_points == 0 {
        return 0.0;
    }
    let perimeter = perimeter_points as f64;
    4.0 * PI * area / (perimeter * perimeter)
}

/// Geometric properties of one raw contour.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProperties {
    /// Absolute shoelace area of the closed boundary polygon.
    pub area: f64,
    /// Inclusive-extent bounding box.
    pub bounding_box: BoundingBox,
    /// Geometric center of the bounding box (not the centroid).
    pub center: Point,
    /// `4 * pi * area / n^2` where `n` is the raw point count.
    pub circularity: f64,
}

/// Compute area, bounding box, center, and circularity for a raw contour.
///
/// An empty contour yields zero area, a zero-sized box, and a center at
/// the origin.
#[must_use]
pub fn shape_properties(contour: &Contour) -> ShapeProperties {
    let points = contour.points();
    let area = polygon_area(points);
    let bbox = bounding_box(points);
    ShapeProperties {
        area,
        bounding_box: bbox,
        center: bbox.center(),
        circularity: circularity(area, points.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_on_axis() {
        // Point (1, 3) is 3 units from the segment (0,0)-(2,0).
        let d = point_segment_distance(
            Point::new(1.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-10);
    }

    #[test]
    fn segment_distance_clamps_to_endpoint() {
        // Point (5, 0) projects past the end of (0,0)-(2,0); the closest
        // point is the endpoint (2,0), not the infinite line.
        let d = point_segment_distance(
            Point::new(5.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-10);
    }

    #[test]
    fn segment_distance_diagonal() {
        // Point (2, -1) against (0,0)-(4,2): perpendicular foot lies inside
        // the segment, distance = 8 / sqrt(20).
        let d = point_segment_distance(
            Point::new(2.0, -1.0),
            Point::new(0.0, 0.0),
            Point::new(4.0, 2.0),
        );
        let expected = 8.0 / 20.0_f64.sqrt();
        assert!((d - expected).abs() < 1e-10, "got {d}, expected {expected}");
    }

    #[test]
    fn segment_distance_coincident_endpoints() {
        let d = point_segment_distance(
            Point::new(3.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn shoelace_area_of_square() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        assert!((polygon_area(&square) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shoelace_area_is_orientation_independent() {
        let cw = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
        ];
        assert!((polygon_area(&cw) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shoelace_area_degenerate_inputs() {
        assert!(polygon_area(&[]).abs() < f64::EPSILON);
        assert!(polygon_area(&[Point::new(1.0, 1.0)]).abs() < f64::EPSILON);
        assert!(
            polygon_area(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]).abs() < f64::EPSILON,
        );
    }

    #[test]
    fn bounding_box_inclusive_extents() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let bbox = bounding_box(&square);
        assert_eq!(
            bbox,
            BoundingBox {
                x: 0,
                y: 0,
                width: 5,
                height: 5,
            },
        );
        assert_eq!(bbox.center(), Point::new(2.5, 2.5));
    }

    #[test]
    fn bounding_box_empty_is_zero_sized() {
        let bbox = bounding_box(&[]);
        assert_eq!(
            bbox,
            BoundingBox {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            },
        );
        assert_eq!(bbox.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn circularity_zero_perimeter_is_zero() {
        assert!(circularity(100.0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn circularity_of_regular_16_gon_exceeds_circle_gate() {
        // With point count as the perimeter proxy, a sparse polygonal
        // approximation of a circle scores far above the 0.75 gate.
        let n = 16;
        let r = 10.0;
        #[allow(clippy::cast_precision_loss)]
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * (i as f64) / (n as f64);
                Point::new(r * angle.cos(), r * angle.sin())
            })
            .collect();
        let circ = circularity(polygon_area(&points), points.len());
        assert!(circ > 0.75, "expected circularity above 0.75, got {circ}");
    }

    #[test]
    fn shape_properties_of_square_contour() {
        let contour = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let props = shape_properties(&contour);
        assert!((props.area - 16.0).abs() < f64::EPSILON);
        assert_eq!(props.bounding_box.width, 5);
        assert_eq!(props.center, Point::new(2.5, 2.5));
        let expected = 4.0 * PI * 16.0 / 16.0;
        assert!((props.circularity - expected).abs() < 1e-10);
    }

    #[test]
    fn shape_properties_of_empty_contour() {
        let props = shape_properties(&Contour::new(vec![]));
        assert!(props.area.abs() < f64::EPSILON);
        assert_eq!(props.bounding_box.width, 0);
        assert_eq!(props.bounding_box.height, 0);
        assert_eq!(props.center, Point::new(0.0, 0.0));
        assert!(props.circularity.abs() < f64::EPSILON);
    }
}
