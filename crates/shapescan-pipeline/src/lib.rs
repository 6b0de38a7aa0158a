//! shapescan-pipeline: pure shape detection pipeline (sans-IO).
//!
//! Detects geometric shapes (circle, triangle, rectangle, pentagon, star)
//! in an effectively-monochrome raster image through:
//! binarization -> contour tracing -> polyline simplification ->
//! property extraction -> classification and confidence scoring.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! buffers and returns structured data. Loading user images and
//! displaying results live with the caller (see the `shapescan-cli`
//! crate for one such caller).
//!
//! Each invocation owns its binary map and contour buffers for its whole
//! lifetime, so independent invocations can run in parallel with no
//! coordination.

pub mod binarize;
pub mod classify;
pub mod confidence;
pub mod diagnostics;
pub mod geometry;
pub mod raster;
pub mod simplify;
pub mod trace;
pub mod types;

use web_time::Instant;

use crate::binarize::BinaryMap;
pub use crate::types::{
    BoundingBox, Contour, DetectError, DetectedShape, DetectionResult, DetectorConfig, Point,
    ShapeKind, StagedDetection,
};

/// Detect shapes in a decoded RGBA raster.
///
/// # Pipeline steps
///
/// 1. Binarize (red channel below `config.threshold` is foreground)
/// 2. Trace contours (Moore-neighbor walks + flood-fill suppression)
/// 3. Simplify each candidate (Ramer-Douglas-Peucker, length-scaled epsilon)
/// 4. Extract properties from the raw contour (area, bounding box,
///    center, circularity)
/// 5. Classify by vertex count and circularity, then score confidence
///
/// Infallible by design: degenerate input (a zero-sized raster, no
/// foreground at all) yields an empty shape list, and a component that is
/// noise-sized or unclassifiable silently produces no shape. Shapes are
/// returned in discovery (raster-scan) order.
#[must_use = "returns the detection result"]
pub fn detect(raster: &types::RgbaImage, config: &DetectorConfig) -> DetectionResult {
    let started = Instant::now();

    let mut map = BinaryMap::from_raster(raster, config.threshold);
    let contours = trace::trace_contours(&mut map);

    let mut shapes = Vec::new();
    for contour in &contours {
        if let ContourOutcome::Shape { shape, .. } = analyze_contour(contour, config) {
            shapes.push(shape);
        }
    }

    DetectionResult {
        shapes,
        processing_time: started.elapsed(),
        image_width: raster.width(),
        image_height: raster.height(),
    }
}

/// Decode raw image bytes, then detect shapes.
///
/// # Errors
///
/// Returns [`DetectError::EmptyInput`] if `bytes` is empty.
/// Returns [`DetectError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn detect_from_bytes(
    bytes: &[u8],
    config: &DetectorConfig,
) -> Result<DetectionResult, DetectError> {
    let raster = raster::decode(bytes)?;
    Ok(detect(&raster, config))
}

/// Run detection, retaining every intermediate stage output.
///
/// Produces the same shapes as [`detect`] plus the binary map snapshot
/// (captured before the tracer consumes it), the raw boundary walks, and
/// the simplified contours of every candidate that passed the
/// minimum-length filter. Useful for previews and for debugging why a
/// component did or did not classify.
#[must_use = "returns the staged detection"]
pub fn detect_staged(raster: &types::RgbaImage, config: &DetectorConfig) -> StagedDetection {
    let started = Instant::now();

    let mut map = BinaryMap::from_raster(raster, config.threshold);
    let binary = map.to_gray_image();
    let contours = trace::trace_contours(&mut map);

    let mut simplified = Vec::new();
    let mut shapes = Vec::new();
    for contour in &contours {
        match analyze_contour(contour, config) {
            ContourOutcome::TooShort => {}
            ContourOutcome::Unclassified { simplified: reduced } => simplified.push(reduced),
            ContourOutcome::Shape {
                shape,
                simplified: reduced,
            } => {
                simplified.push(reduced);
                shapes.push(shape);
            }
        }
    }

    let result = DetectionResult {
        shapes,
        processing_time: started.elapsed(),
        image_width: raster.width(),
        image_height: raster.height(),
    };

    StagedDetection {
        binary,
        contours,
        simplified,
        result,
    }
}

/// Outcome of analyzing one raw contour.
pub(crate) enum ContourOutcome {
    /// Below the minimum point count. The normal, silent outcome for
    /// noise-sized components.
    TooShort,
    /// Long enough, but the classifier produced no category.
    Unclassified {
        /// The simplified contour, kept for staged inspection.
        simplified: Contour,
    },
    /// An accepted shape.
    Shape {
        /// The assembled shape.
        shape: DetectedShape,
        /// The simplified contour it was classified from.
        simplified: Contour,
    },
}

/// Simplify, measure, classify, and score one raw contour.
pub(crate) fn analyze_contour(contour: &Contour, config: &DetectorConfig) -> ContourOutcome {
    if contour.len() < config.min_contour_points {
        return ContourOutcome::TooShort;
    }

    let props = geometry::shape_properties(contour);

    #[allow(clippy::cast_precision_loss)]
    let epsilon = config.simplify_ratio * contour.len() as f64;
    let simplified = simplify::simplify(contour, epsilon);
    let vertices = classify::vertex_count(&simplified);

    let Some(kind) = classify::classify(vertices, props.circularity) else {
        return ContourOutcome::Unclassified { simplified };
    };

    let confidence = confidence::score(
        kind,
        vertices,
        props.circularity,
        contour.len(),
        &props.bounding_box,
    );

    ContourOutcome::Shape {
        shape: DetectedShape {
            kind,
            confidence,
            bounding_box: props.bounding_box,
            center: props.center,
            area: props.area,
        },
        simplified,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};

    use super::*;
    use crate::types::RgbaImage;

    const INK: image::Rgba<u8> = image::Rgba([0, 0, 0, 255]);
    const PAPER: image::Rgba<u8> = image::Rgba([255, 255, 255, 255]);

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, PAPER)
    }

    #[test]
    fn filled_disc_is_a_confident_circle() {
        let mut img = blank(48, 48);
        draw_filled_circle_mut(&mut img, (24, 24), 16, INK);

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 1);
        let shape = &result.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Circle);
        assert!(shape.confidence > 0.8, "confidence {}", shape.confidence);
        assert!(
            shape.center.distance(Point::new(24.0, 24.0)) < 2.0,
            "center {:?}",
            shape.center,
        );
        assert!(
            (31..=35).contains(&shape.bounding_box.width),
            "bbox {:?}",
            shape.bounding_box,
        );
        assert_eq!(result.image_width, 48);
        assert_eq!(result.image_height, 48);
    }

    #[test]
    fn right_triangle_classifies_with_base_confidence() {
        // Axis-aligned legs and a 45-degree hypotenuse rasterize exactly,
        // so the boundary walk and its simplification are fully predictable.
        let img = RgbaImage::from_fn(24, 24, |x, y| {
            if x >= 2 && y >= 2 && x + y <= 20 {
                INK
            } else {
                PAPER
            }
        });

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 1);
        let shape = &result.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Triangle);
        assert!((shape.confidence - 0.9).abs() < 1e-9);
        assert!((shape.area - 128.0).abs() < 1e-9);
    }

    #[test]
    fn elongated_rectangle_classifies_exactly() {
        let img = RgbaImage::from_fn(26, 10, |x, y| {
            if (2..=21).contains(&x) && (2..=6).contains(&y) {
                INK
            } else {
                PAPER
            }
        });

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 1);
        let shape = &result.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Rectangle);
        assert!((shape.confidence - 0.9).abs() < 1e-9);
        assert_eq!(
            shape.bounding_box,
            BoundingBox {
                x: 2,
                y: 2,
                width: 20,
                height: 5,
            },
        );
        assert_eq!(shape.center, Point::new(12.0, 4.5));
        assert!((shape.area - 76.0).abs() < 1e-9);
    }

    #[test]
    fn house_pentagon_classifies() {
        let mut img = blank(70, 30);
        let vertices: Vec<imageproc::point::Point<i32>> =
            [(4, 24), (4, 14), (34, 4), (64, 14), (64, 24)]
                .iter()
                .map(|&(x, y)| imageproc::point::Point::new(x, y))
                .collect();
        draw_polygon_mut(&mut img, &vertices, INK);

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 1);
        let shape = &result.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Pentagon);
        assert!((shape.confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn five_pointed_star_classifies() {
        let mut img = blank(64, 64);
        #[allow(clippy::cast_possible_truncation)]
        let vertices: Vec<imageproc::point::Point<i32>> = (0..10)
            .map(|i| {
                let angle = f64::from(i) * std::f64::consts::PI / 5.0 - std::f64::consts::FRAC_PI_2;
                let radius = if i % 2 == 0 { 20.0 } else { 8.0 };
                imageproc::point::Point::new(
                    (32.0 + radius * angle.cos()).round() as i32,
                    (32.0 + radius * angle.sin()).round() as i32,
                )
            })
            .collect();
        draw_polygon_mut(&mut img, &vertices, INK);

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 1);
        let shape = &result.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Star);
        assert!(shape.confidence > 0.8, "confidence {}", shape.confidence);
    }

    #[test]
    fn disjoint_squares_detect_independently() {
        let img = RgbaImage::from_fn(48, 24, |x, y| {
            let in_left = (4..16).contains(&x) && (6..18).contains(&y);
            let in_right = (28..40).contains(&x) && (6..18).contains(&y);
            if in_left || in_right { INK } else { PAPER }
        });

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 2);

        // Discovery order follows the raster scan.
        assert_eq!(result.shapes[0].bounding_box.x, 4);
        assert_eq!(result.shapes[1].bounding_box.x, 28);
        for shape in &result.shapes {
            assert_eq!(shape.bounding_box.width, 12);
            assert_eq!(shape.bounding_box.height, 12);
            assert!((shape.area - 121.0).abs() < 1e-9);
        }
        assert_eq!(result.shapes[0].kind, result.shapes[1].kind);
    }

    #[test]
    fn annulus_collapses_to_its_outer_boundary() {
        let mut img = blank(48, 48);
        draw_filled_circle_mut(&mut img, (24, 24), 16, INK);
        draw_filled_circle_mut(&mut img, (24, 24), 8, PAPER);

        let result = detect(&img, &DetectorConfig::default());
        assert_eq!(result.shapes.len(), 1);
        let shape = &result.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Circle);
        // The hole is filled in, not subtracted.
        assert!(shape.area > 600.0, "area {}", shape.area);
    }

    #[test]
    fn noise_sized_components_produce_no_shape() {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            if (5..7).contains(&x) && (5..7).contains(&y) {
                INK
            } else {
                PAPER
            }
        });

        let result = detect(&img, &DetectorConfig::default());
        assert!(result.shapes.is_empty());
    }

    #[test]
    fn blank_raster_detects_nothing() {
        let result = detect(&blank(32, 32), &DetectorConfig::default());
        assert!(result.shapes.is_empty());
    }

    #[test]
    fn all_dark_raster_detects_nothing() {
        let img = RgbaImage::from_pixel(10, 10, INK);
        let result = detect(&img, &DetectorConfig::default());
        assert!(result.shapes.is_empty());
    }

    #[test]
    fn zero_sized_raster_detects_nothing() {
        let result = detect(&RgbaImage::new(0, 0), &DetectorConfig::default());
        assert!(result.shapes.is_empty());
        assert_eq!(result.image_width, 0);
        assert_eq!(result.image_height, 0);
    }

    #[test]
    fn staged_detection_retains_intermediates() {
        let img = RgbaImage::from_fn(48, 24, |x, y| {
            let in_left = (4..16).contains(&x) && (6..18).contains(&y);
            let in_right = (28..40).contains(&x) && (6..18).contains(&y);
            if in_left || in_right { INK } else { PAPER }
        });
        let config = DetectorConfig::default();

        let staged = detect_staged(&img, &config);
        assert_eq!(staged.contours.len(), 2);
        assert_eq!(staged.simplified.len(), 2);
        // The snapshot is taken before the tracer consumes the map.
        assert_eq!(staged.binary.get_pixel(4, 6).0[0], 255);
        assert_eq!(staged.binary.get_pixel(0, 0).0[0], 0);
        assert_eq!(staged.result.shapes, detect(&img, &config).shapes);
    }

    #[test]
    fn detect_from_bytes_decodes_then_detects() {
        let mut img = blank(48, 48);
        draw_filled_circle_mut(&mut img, (24, 24), 16, INK);
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();

        let result = detect_from_bytes(&buf, &DetectorConfig::default()).unwrap();
        assert_eq!(result.shapes.len(), 1);
        assert_eq!(result.shapes[0].kind, ShapeKind::Circle);
    }

    #[test]
    fn detect_from_bytes_rejects_empty_input() {
        let result = detect_from_bytes(&[], &DetectorConfig::default());
        assert!(matches!(result, Err(DetectError::EmptyInput)));
    }

    #[test]
    fn min_contour_points_is_configurable() {
        // A 6x6 square produces a 20-point walk: dropped under a stricter
        // minimum, detected under the default.
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            if (4..10).contains(&x) && (4..10).contains(&y) {
                INK
            } else {
                PAPER
            }
        });
        let strict = DetectorConfig {
            min_contour_points: 30,
            ..DetectorConfig::default()
        };
        assert!(detect(&img, &strict).shapes.is_empty());

        let lenient = DetectorConfig::default();
        assert_eq!(detect(&img, &lenient).shapes.len(), 1);
    }
}
