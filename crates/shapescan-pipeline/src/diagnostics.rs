//! Detection diagnostics: timing, counts, and other metrics for each
//! pipeline stage.
//!
//! Permanent instrumentation for threshold tuning and parameter
//! experimentation: [`detect_with_diagnostics`] runs the same pipeline as
//! [`detect`](crate::detect) while collecting per-stage wall-clock
//! durations and counts.
//!
//! Duration measurements use [`std::time::Duration`] (platform-agnostic).
//! Timestamps are captured via the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::binarize::BinaryMap;
use crate::types::duration_serde;
use crate::types::{Contour, DetectionResult, DetectorConfig, RgbaImage};
use crate::{ContourOutcome, analyze_contour};

/// Diagnostics collected from a single detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionDiagnostics {
    /// Stage 1: binarization.
    pub binarize: StageDiagnostics,
    /// Stage 2: contour tracing (boundary walks + flood-fill suppression).
    pub tracing: StageDiagnostics,
    /// Stages 3-5: per-contour simplification, property extraction,
    /// classification, and scoring.
    pub analysis: StageDiagnostics,
    /// Total wall-clock duration of the entire run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: DetectionSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics (counts, sizes, etc.).
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Binarization metrics.
    Binarize {
        /// Map width in pixels.
        width: u32,
        /// Map height in pixels.
        height: u32,
        /// Number of foreground cells before tracing consumed them.
        foreground_pixel_count: u64,
        /// Total cell count for computing foreground density.
        total_pixel_count: u64,
    },
    /// Contour tracing metrics.
    ContourTracing {
        /// Number of boundary walks found.
        contour_count: usize,
        /// Total number of points across all contours.
        total_point_count: usize,
        /// Minimum points in any single contour.
        min_contour_points: usize,
        /// Maximum points in any single contour.
        max_contour_points: usize,
        /// Mean points per contour.
        mean_contour_points: f64,
    },
    /// Per-contour analysis metrics.
    Analysis {
        /// Contours long enough to be considered.
        candidate_count: usize,
        /// Contours dropped by the minimum-length filter.
        skipped_short_count: usize,
        /// Candidates the classifier could not label.
        unclassified_count: usize,
        /// Shapes produced.
        shape_count: usize,
    },
}

/// High-level summary counts for the entire run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Source raster width in pixels.
    pub image_width: u32,
    /// Source raster height in pixels.
    pub image_height: u32,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Number of boundary walks found.
    pub contour_count: usize,
    /// Number of shapes detected.
    pub shape_count: usize,
}

/// Run detection while collecting per-stage diagnostics.
///
/// Produces exactly the same [`DetectionResult`] as
/// [`detect`](crate::detect) on the same input and configuration.
#[must_use = "returns the detection result and its diagnostics"]
pub fn detect_with_diagnostics(
    raster: &RgbaImage,
    config: &DetectorConfig,
) -> (DetectionResult, DetectionDiagnostics) {
    let total_start = Instant::now();

    let stage_start = Instant::now();
    let mut map = BinaryMap::from_raster(raster, config.threshold);
    let binarize = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Binarize {
            width: map.width(),
            height: map.height(),
            foreground_pixel_count: map.foreground_count() as u64,
            total_pixel_count: map.len() as u64,
        },
    };

    let stage_start = Instant::now();
    let contours = crate::trace::trace_contours(&mut map);
    let stats = contour_stats(&contours);
    let tracing = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::ContourTracing {
            contour_count: contours.len(),
            total_point_count: stats.total,
            min_contour_points: stats.min,
            max_contour_points: stats.max,
            mean_contour_points: stats.mean,
        },
    };

    let stage_start = Instant::now();
    let mut shapes = Vec::new();
    let mut skipped_short = 0;
    let mut unclassified = 0;
    for contour in &contours {
        match analyze_contour(contour, config) {
            ContourOutcome::TooShort => skipped_short += 1,
            ContourOutcome::Unclassified { .. } => unclassified += 1,
            ContourOutcome::Shape { shape, .. } => shapes.push(shape),
        }
    }
    let analysis = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Analysis {
            candidate_count: contours.len() - skipped_short,
            skipped_short_count: skipped_short,
            unclassified_count: unclassified,
            shape_count: shapes.len(),
        },
    };

    let shape_count = shapes.len();
    let result = DetectionResult {
        shapes,
        processing_time: total_start.elapsed(),
        image_width: raster.width(),
        image_height: raster.height(),
    };
    let diagnostics = DetectionDiagnostics {
        binarize,
        tracing,
        analysis,
        total_duration: result.processing_time,
        summary: DetectionSummary {
            image_width: raster.width(),
            image_height: raster.height(),
            pixel_count: u64::from(raster.width()) * u64::from(raster.height()),
            contour_count: contours.len(),
            shape_count,
        },
    };

    (result, diagnostics)
}

impl DetectionDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Detection Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.summary.image_width, self.summary.image_height, self.summary.pixel_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        // Per-stage breakdown.
        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Binarize", &self.binarize),
            ("Contour Tracing", &self.tracing),
            ("Analysis", &self.analysis),
        ];

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Contours: {}  |  Shapes: {}",
            self.summary.contour_count, self.summary.shape_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Binarize {
            width,
            height,
            foreground_pixel_count,
            total_pixel_count,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let density = if *total_pixel_count > 0 {
                *foreground_pixel_count as f64 / *total_pixel_count as f64 * 100.0
            } else {
                0.0
            };
            format!("{width}x{height} foreground={foreground_pixel_count} ({density:.1}%)")
        }
        StageMetrics::ContourTracing {
            contour_count,
            total_point_count,
            min_contour_points,
            max_contour_points,
            mean_contour_points,
        } => {
            format!(
                "{contour_count} contours, {total_point_count} pts (min={min_contour_points} max={max_contour_points} mean={mean_contour_points:.1})",
            )
        }
        StageMetrics::Analysis {
            candidate_count,
            skipped_short_count,
            unclassified_count,
            shape_count,
        } => {
            format!(
                "{candidate_count} candidates ({skipped_short_count} short, {unclassified_count} unclassified) -> {shape_count} shapes",
            )
        }
    }
}

/// Statistics for a set of contours.
pub(crate) struct ContourStats {
    /// Total number of points across all contours.
    pub total: usize,
    /// Minimum number of points in any single contour.
    pub min: usize,
    /// Maximum number of points in any single contour.
    pub max: usize,
    /// Mean number of points per contour.
    pub mean: f64,
}

/// Compute contour statistics from a set of boundary walks.
pub(crate) fn contour_stats(contours: &[Contour]) -> ContourStats {
    let total: usize = contours.iter().map(Contour::len).sum();
    let min = contours.iter().map(Contour::len).min().unwrap_or(0);
    let max = contours.iter().map(Contour::len).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let mean = if contours.is_empty() {
        0.0
    } else {
        total as f64 / contours.len() as f64
    };
    ContourStats {
        total,
        min,
        max,
        mean,
    }
}
