//! Shared types for the shapescan detection pipeline.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can hand the detector a
/// decoded raster without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export `GrayImage` so downstream crates can render the binary map
/// snapshot from [`StagedDetection`] without depending on `image` directly.
pub use image::GrayImage;

/// Serde support for `std::time::Duration` as fractional seconds.
///
/// `std::time::Duration` does not implement the serde traits, and
/// fractional seconds keep the JSON output flat and readable.
pub(crate) mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A 2D point in image coordinates.
///
/// Raw contour points carry integer-valued coordinates (pixel centers);
/// simplified and derived geometry may be real-valued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An ordered point sequence describing one boundary walk.
///
/// A traced contour is closed: the last point is a boundary neighbor of
/// the first, and the closing point is not stored twice. A simplified
/// contour may still carry a near-duplicate closing point, which vertex
/// counting collapses (see [`crate::classify::vertex_count`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour(Vec<Point>);

impl Contour {
    /// Create a new contour from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the contour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the contour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the contour and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// Axis-aligned bounding box in inclusive pixel extents.
///
/// `width` and `height` count pixels: a box spanning columns 0..=4 has
/// `x = 0, width = 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Leftmost pixel column.
    pub x: i32,
    /// Topmost pixel row.
    pub y: i32,
    /// Width in pixels (inclusive extent).
    pub width: u32,
    /// Height in pixels (inclusive extent).
    pub height: u32,
}

impl BoundingBox {
    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }
}

/// The closed set of shape categories the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Round contour (high circularity or many vertices).
    Circle,
    /// Three-vertex polygon.
    Triangle,
    /// Four-vertex polygon.
    Rectangle,
    /// Five-vertex polygon (also the fallback for rounded hexagons).
    Pentagon,
    /// Ten-to-twelve-vertex spiky polygon.
    Star,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Rectangle => "rectangle",
            Self::Pentagon => "pentagon",
            Self::Star => "star",
        };
        f.write_str(name)
    }
}

/// One detected shape.
///
/// Created once per accepted contour and never mutated afterwards;
/// ownership passes entirely to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedShape {
    /// Shape category.
    pub kind: ShapeKind,
    /// Heuristic confidence in `[0, 1]`.
    pub confidence: f64,
    /// Bounding box of the raw contour.
    pub bounding_box: BoundingBox,
    /// Geometric center of the bounding box.
    pub center: Point,
    /// Absolute polygon area of the raw contour (shoelace).
    pub area: f64,
}

/// Result of one [`detect`](crate::detect) invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected shapes in discovery (raster-scan) order.
    pub shapes: Vec<DetectedShape>,
    /// Wall-clock duration of the detection run (seconds when serialized).
    #[serde(with = "duration_serde")]
    pub processing_time: Duration,
    /// Source raster width in pixels.
    pub image_width: u32,
    /// Source raster height in pixels.
    pub image_height: u32,
}

/// Result of running detection with all intermediate stage outputs preserved.
///
/// Each field captures the output of one pipeline stage, letting a caller
/// display the binary map, the raw boundary walks, and the simplified
/// candidate polygons alongside the final shapes.
#[derive(Debug, Clone)]
pub struct StagedDetection {
    /// Stage 1: binary map rendered as a grayscale image (255 = foreground),
    /// captured before the tracer consumes it.
    pub binary: GrayImage,
    /// Stage 2: raw boundary walks, one per connected component.
    pub contours: Vec<Contour>,
    /// Stage 3: simplified contours for the components that passed the
    /// minimum-length filter (parallel to the accepted candidates, not to
    /// `contours`).
    pub simplified: Vec<Contour>,
    /// Stages 4-5: the assembled detection result.
    pub result: DetectionResult,
}

/// Configuration for the detection pipeline.
///
/// Only the pre-classification knobs are configurable. The classifier
/// decision boundaries and confidence constants are fixed: they are the
/// decision rule itself, and changing them changes which labels the
/// pipeline reproduces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Red-channel binarization threshold. A pixel is foreground when its
    /// red channel is strictly less than this value.
    pub threshold: u8,

    /// Minimum raw contour point count for a component to be considered.
    /// Shorter walks are noise-sized and silently dropped.
    pub min_contour_points: usize,

    /// Ramer-Douglas-Peucker tolerance as a fraction of the raw contour
    /// point count. Larger shapes tolerate proportionally larger
    /// simplification error.
    pub simplify_ratio: f64,
}

impl DetectorConfig {
    /// Default binarization threshold.
    pub const DEFAULT_THRESHOLD: u8 = 127;

    /// Default minimum raw contour point count.
    pub const DEFAULT_MIN_CONTOUR_POINTS: usize = 10;

    /// Default simplification tolerance ratio.
    pub const DEFAULT_SIMPLIFY_RATIO: f64 = 0.02;
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            min_contour_points: Self::DEFAULT_MIN_CONTOUR_POINTS,
            simplify_ratio: Self::DEFAULT_SIMPLIFY_RATIO,
        }
    }
}

/// Errors that can occur at the decode boundary.
///
/// The pipeline interior has no recoverable-error taxonomy: degenerate
/// geometry falls back to explicit default values, and a component that
/// cannot be classified simply produces no shape.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
}
