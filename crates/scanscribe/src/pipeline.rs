//! Per-file pipeline orchestration.
//!
//! Ties the stages together for one image: preprocess, density gate, OCR
//! invocation, lexical filter. Per-file failures become status outcomes,
//! never errors; the batch driver relies on that to keep going.

use crate::config::PipelineConfig;
use crate::density;
use crate::filter::LexicalFilter;
use crate::lexicon::Dictionary;
use crate::ocr::{OcrBackend, OcrInvoker};
use crate::preprocess;
use crate::report::Transcript;
use image::{DynamicImage, GrayImage};
use std::path::Path;
use tracing::{debug, warn};

/// The image-to-clean-text pipeline for one run.
///
/// Holds only shared read-only state; processing files in any order (or,
/// in a concurrent driver, from multiple threads) is safe.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    backend: &'a dyn OcrBackend,
    dictionary: &'a Dictionary,
    filter: LexicalFilter,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, backend: &'a dyn OcrBackend, dictionary: &'a Dictionary) -> Self {
        Self {
            config,
            backend,
            dictionary,
            filter: LexicalFilter::new(config.strictness),
        }
    }

    /// Run the full pipeline on a decoded image.
    pub fn process_image(&self, image: &DynamicImage) -> Transcript {
        let prepared = preprocess::preprocess(image, self.config);

        if self.config.density_gate && !density::has_text(&prepared, self.config.density_threshold) {
            debug!(
                density = density::foreground_fraction(&prepared),
                threshold = self.config.density_threshold,
                "density gate rejected image; skipping OCR"
            );
            return Transcript::InsufficientDensity;
        }

        let invoker = OcrInvoker::new(self.backend, self.dictionary);
        let raw = invoker.recognize(
            &prepared,
            &self.config.language_spec(),
            self.config.psm,
            self.config.max_attempts,
        );

        let cleaned = self.filter.clean(&raw, self.dictionary);
        if cleaned.is_empty() {
            Transcript::NoTextDetected
        } else {
            Transcript::Text(cleaned)
        }
    }

    /// Load and process one file.
    ///
    /// Undecodable files are logged and recorded as `NoTextDetected`; the
    /// batch is never aborted by a bad scan.
    pub fn process_file(&self, path: &Path) -> Transcript {
        match preprocess::load_image(path) {
            Ok(image) => self.process_image(&image),
            Err(err) => {
                warn!(file = %path.display(), %err, "failed to decode image");
                Transcript::NoTextDetected
            }
        }
    }

    /// The preprocessed form of an image, for the visual QA artifact.
    pub fn preprocess_preview(&self, image: &DynamicImage) -> GrayImage {
        preprocess::preprocess(image, self.config)
    }
}
