//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the RGBA
//! raster buffer the detector consumes. Detection itself only samples the
//! red channel (input images are assumed effectively monochrome), but
//! the full RGBA buffer is kept so callers can overlay results on the
//! original pixels.

use crate::types::{DetectError, RgbaImage};

/// Decode raw image bytes into an RGBA raster.
///
/// Supports PNG, JPEG, BMP, and WebP (whatever the `image` crate can
/// decode with the enabled features).
///
/// # Errors
///
/// Returns [`DetectError::EmptyInput`] if `bytes` is empty.
/// Returns [`DetectError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, DetectError> {
    if bytes.is_empty() {
        return Err(DetectError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}
