//! Tesseract OCR backend.

use super::backend::OcrBackend;
use crate::error::{Result, ScanscribeError};
use image::GrayImage;
use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};
use std::env;
use std::path::{Path, PathBuf};

/// Well-known tessdata locations probed when `TESSDATA_PREFIX` is unset.
const TESSDATA_FALLBACK_PATHS: &[&str] = &[
    "/opt/homebrew/share/tessdata",
    "/opt/homebrew/opt/tesseract/share/tessdata",
    "/usr/local/opt/tesseract/share/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    r#"C:\Program Files\Tesseract-OCR\tessdata"#,
    r#"C:\ProgramData\Tesseract-OCR\tessdata"#,
];

/// OCR backend backed by the Tesseract engine.
///
/// A fresh Tesseract API instance is created per recognition call; the
/// engine carries per-image adaption state that must not leak between
/// files (or between retry attempts, which count on re-running the
/// engine's internal heuristics from scratch).
pub struct TesseractBackend {
    tessdata_dir: String,
}

impl TesseractBackend {
    /// Construct a backend, discovering the tessdata directory from
    /// `TESSDATA_PREFIX` or the well-known fallback locations.
    pub fn new() -> Self {
        Self {
            tessdata_dir: discover_tessdata_dir(),
        }
    }

    /// Construct a backend with an explicit tessdata directory.
    pub fn with_tessdata_dir(dir: impl Into<String>) -> Self {
        Self { tessdata_dir: dir.into() }
    }

    /// Reject language specs that would crash the engine: empty specs and
    /// missing traineddata files fail fast instead of segfaulting inside
    /// Tesseract.
    fn validate_language(&self, language: &str) -> Result<()> {
        if language.trim().is_empty() {
            return Err(ScanscribeError::ocr(
                "Language cannot be empty. Specify a valid language code (e.g., 'eng')",
            ));
        }
        if self.tessdata_dir.is_empty() {
            return Ok(());
        }
        for lang in language.split('+') {
            let lang = lang.trim();
            if lang.is_empty() {
                continue;
            }
            let traineddata = Path::new(&self.tessdata_dir).join(format!("{}.traineddata", lang));
            if !traineddata.exists() {
                return Err(ScanscribeError::ocr(format!(
                    "Language '{}' not found: {} does not exist",
                    lang,
                    traineddata.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn recognize_raw(&self, image: &GrayImage, language: &str, psm: u8) -> Result<String> {
        self.validate_language(language)?;

        let api = TesseractAPI::new();
        api.init(&self.tessdata_dir, language).map_err(|e| {
            ScanscribeError::ocr(format!("Failed to initialize language '{}': {}", language, e))
        })?;

        api.set_page_seg_mode(TessPageSegMode::from_int(psm as i32))
            .map_err(|e| ScanscribeError::ocr(format!("Failed to set PSM mode {}: {}", psm, e)))?;

        let (width, height) = image.dimensions();
        // Binarized grayscale: one byte per pixel, rows are width bytes apart.
        api.set_image(image.as_raw(), width as i32, height as i32, 1, width as i32)
            .map_err(|e| ScanscribeError::ocr(format!("Failed to set image: {}", e)))?;

        api.recognize()
            .map_err(|e| ScanscribeError::ocr(format!("Recognition failed: {}", e)))?;

        let text = api
            .get_utf8_text()
            .map_err(|e| ScanscribeError::ocr(format!("Failed to extract text: {}", e)))?;

        Ok(text)
    }
}

fn discover_tessdata_dir() -> String {
    if let Ok(prefix) = env::var("TESSDATA_PREFIX") {
        let prefix_path = PathBuf::from(&prefix);
        // TESSDATA_PREFIX may point at the tessdata directory itself or at
        // its parent.
        let tessdata = if prefix_path.ends_with("tessdata") {
            prefix_path
        } else {
            prefix_path.join("tessdata")
        };
        return tessdata.to_string_lossy().into_owned();
    }

    TESSDATA_FALLBACK_PATHS
        .iter()
        .find(|p| Path::new(p).exists())
        .map(|p| (*p).to_string())
        .unwrap_or_default()
}
