//! Text density gate.
//!
//! Cheaply rejects blank pages and pure-graphic images before paying for an
//! OCR call. Operates on the binarized output of the preprocessor, where
//! ink is dark and paper is white.

use image::GrayImage;

/// Pixels darker than this count as foreground (ink). The preprocessor
/// emits two-level images, so anything below the midpoint is ink.
const FOREGROUND_CUTOFF: u8 = 128;

/// Fraction of foreground (dark) pixels in the image, in `[0, 1]`.
///
/// An empty (zero-pixel) image has density 0.
pub fn foreground_fraction(image: &GrayImage) -> f64 {
    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return 0.0;
    }

    let dark = image.pixels().filter(|p| p.0[0] < FOREGROUND_CUTOFF).count() as u64;
    dark as f64 / total as f64
}

/// Whether the image plausibly contains text.
///
/// An image sitting exactly at the threshold passes (`>=`, not `>`).
pub fn has_text(image: &GrayImage, threshold: f64) -> bool {
    foreground_fraction(image) >= threshold
}
