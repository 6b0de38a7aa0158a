//! shapescan: command-line shape detection.
//!
//! Reads an image file, runs the detection pipeline, and prints the
//! detected shapes as a fixed-width table or as JSON. Useful for:
//!
//! - Spot-checking detection on test images
//! - Tuning the binarization threshold and minimum contour length
//! - Measuring per-stage durations with `--diagnostics`
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin shapescan -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shapescan_pipeline::{DetectionResult, DetectorConfig};

/// Detect geometric shapes (circle, triangle, rectangle, pentagon, star)
/// in a monochrome raster image.
#[derive(Parser)]
#[command(name = "shapescan", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Red-channel binarization threshold; pixels strictly below are
    /// foreground.
    #[arg(long, default_value_t = DetectorConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Minimum raw contour point count for a component to be considered.
    #[arg(long, default_value_t = DetectorConfig::DEFAULT_MIN_CONTOUR_POINTS)]
    min_contour_points: usize,

    /// Simplification tolerance as a fraction of the raw contour point
    /// count.
    #[arg(long, default_value_t = DetectorConfig::DEFAULT_SIMPLIFY_RATIO)]
    simplify_ratio: f64,

    /// Output the detection result as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Print per-stage diagnostics to stderr.
    #[arg(long)]
    diagnostics: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let raster = match shapescan_pipeline::raster::decode(&bytes) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let config = DetectorConfig {
        threshold: cli.threshold,
        min_contour_points: cli.min_contour_points,
        simplify_ratio: cli.simplify_ratio,
    };

    let result = if cli.diagnostics {
        let (result, diagnostics) =
            shapescan_pipeline::diagnostics::detect_with_diagnostics(&raster, &config);
        eprintln!("{}", diagnostics.report());
        result
    } else {
        shapescan_pipeline::detect(&raster, &config)
    };

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", format_report(&result));
    }

    ExitCode::SUCCESS
}

/// Render a detection result as a fixed-width table.
fn format_report(result: &DetectionResult) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} shape(s) in {}x{} ({:.3}ms)",
        result.shapes.len(),
        result.image_width,
        result.image_height,
        result.processing_time.as_secs_f64() * 1000.0,
    ));

    if result.shapes.is_empty() {
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<12} {:>10} {:>16} {:>16} {:>10}",
        "Kind", "Confidence", "Bounding Box", "Center", "Area"
    ));
    lines.push("-".repeat(70));
    for shape in &result.shapes {
        let bbox = format!(
            "{}x{}+{}+{}",
            shape.bounding_box.width,
            shape.bounding_box.height,
            shape.bounding_box.x,
            shape.bounding_box.y,
        );
        let center = format!("({:.1}, {:.1})", shape.center.x, shape.center.y);
        lines.push(format!(
            "{:<12} {:>10.2} {:>16} {:>16} {:>10.1}",
            shape.kind.to_string(),
            shape.confidence,
            bbox,
            center,
            shape.area,
        ));
    }
    lines.join("\n")
}
