//! Binarization: derive a two-valued foreground/background map from a
//! raster buffer.
//!
//! Only the red channel is sampled; input images are assumed effectively
//! monochrome, so one channel carries the intensity. A pixel is foreground
//! when its red value is strictly below the threshold (shapes are dark on
//! a light background).
//!
//! The resulting [`BinaryMap`] is owned by a single detection call. The
//! contour tracer consumes it in place: flood fill marks traced components
//! as background so the raster scan never revisits them. That mutation is
//! the tracer's sole side effect and is never exposed to callers.

use crate::types::{GrayImage, RgbaImage};

/// A width x height grid of foreground/background cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMap {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl BinaryMap {
    /// Build a binary map from an RGBA raster.
    ///
    /// A pixel is foreground when its red channel is strictly less than
    /// `threshold`. Pure, single-pass, no failure modes: a zero-sized
    /// raster yields a zero-sized map.
    #[must_use]
    pub fn from_raster(raster: &RgbaImage, threshold: u8) -> Self {
        let width = raster.width();
        let height = raster.height();
        let cells = raster.pixels().map(|p| p.0[0] < threshold).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Map width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total cell count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the map has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the cell at `(x, y)` is foreground.
    ///
    /// Out-of-bounds coordinates are background, so boundary walks can
    /// probe neighbor rings without bounds bookkeeping.
    #[must_use]
    pub fn is_foreground(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx]
    }

    /// Mark the in-bounds cell at `(x, y)` as background.
    pub(crate) fn clear(&mut self, x: u32, y: u32) {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx] = false;
    }

    /// Number of foreground cells.
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|&&fg| fg).count()
    }

    /// Render the map as a grayscale image (255 = foreground).
    ///
    /// Used for previews and debugging; see
    /// [`StagedDetection`](crate::StagedDetection).
    #[must_use]
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            let fg = self.is_foreground(i64::from(x), i64::from(y));
            image::Luma([if fg { 255 } else { 0 }])
        })
    }
}
