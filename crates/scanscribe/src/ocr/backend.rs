//! OCR backend trait.
//!
//! The seam between the pipeline and the external recognition engine.
//! Implement this to plug in a different engine; tests use a scripted
//! in-memory backend.

use crate::error::Result;
use image::GrayImage;

/// A black-box character recognition capability.
///
/// Given a preprocessed raster image and a language/layout hint, returns
/// the raw recognized string. Backends may be non-deterministic across
/// calls; the invoker layer relies on that when it retries.
///
/// Backends must be `Send + Sync`: a concurrent batch driver partitions
/// work by file and shares one backend instance.
pub trait OcrBackend: Send + Sync {
    /// Recognize text in a preprocessed image.
    ///
    /// # Arguments
    ///
    /// * `image` - Binarized grayscale raster from the preprocessor
    /// * `language` - Backend language/model spec (e.g. `"eng"`,
    ///   `"eng+script/Latin"`)
    /// * `psm` - Page segmentation mode hint (Tesseract numbering, 0-10)
    ///
    /// # Errors
    ///
    /// Backend failures surface as `ScanscribeError::Ocr`. The invoker
    /// catches them; they never abort a batch.
    fn recognize_raw(&self, image: &GrayImage, language: &str, psm: u8) -> Result<String>;
}
