//! Pipeline configuration loading and management.
//!
//! The legacy scripts this tool replaces were a family of near-duplicate
//! pipelines that differed only in which preprocessing steps, OCR modes,
//! retry policies, and filter profiles were active. All of those knobs live
//! here in one `PipelineConfig`, constructed once at startup and passed by
//! reference into each component; there is no ambient global state.

use crate::error::{Result, ScanscribeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Noise-reduction filter applied between grayscale conversion and
/// binarization.
///
/// Gaussian blur favors smooth gradients; a median filter favors
/// salt-and-pepper scan artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenoiseFilter {
    None,
    Gaussian,
    Median,
}

/// Binarization policy.
///
/// `Otsu` picks the threshold from the image's own intensity histogram and
/// is preferred when lighting varies across the corpus; `Fixed` applies
/// `fixed_threshold` uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    Fixed,
    Otsu,
}

/// Recognition model hint passed to the OCR backend.
///
/// `Combined` runs the typed and handwritten models simultaneously and is
/// the default: it avoids the brittle typed-first-then-handwritten
/// two-pass dispatch the legacy variants used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrMode {
    Typed,
    Handwritten,
    Combined,
}

impl FromStr for OcrMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "typed" => Ok(OcrMode::Typed),
            "handwritten" => Ok(OcrMode::Handwritten),
            "combined" => Ok(OcrMode::Combined),
            other => Err(format!(
                "Invalid OCR mode '{}'. Must be one of: typed, handwritten, combined",
                other
            )),
        }
    }
}

/// Lexical filter strictness profile.
///
/// `Strict` raises the minimum token length from 2 to 3 and additionally
/// rejects tokens made of a single distinct character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrictnessProfile {
    Standard,
    Strict,
}

impl StrictnessProfile {
    /// Minimum surviving token length for this profile.
    pub fn min_token_len(self) -> usize {
        match self {
            StrictnessProfile::Standard => 2,
            StrictnessProfile::Strict => 3,
        }
    }
}

impl FromStr for StrictnessProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "standard" => Ok(StrictnessProfile::Standard),
            "strict" => Ok(StrictnessProfile::Strict),
            other => Err(format!(
                "Invalid strictness profile '{}'. Must be one of: standard, strict",
                other
            )),
        }
    }
}

/// Configuration for one batch run.
///
/// Can be loaded from a TOML file or created programmatically; every field
/// has a default so partial files work.
///
/// # Example
///
/// ```rust
/// use scanscribe::config::{PipelineConfig, ThresholdPolicy};
///
/// let config = PipelineConfig {
///     resize_factor: Some(1.1),
///     threshold: ThresholdPolicy::Otsu,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upscale factor applied before grayscale conversion (None = no
    /// upscaling). Compensates for low-resolution source scans.
    #[serde(default)]
    pub resize_factor: Option<f32>,

    /// Contrast boost factor applied after grayscale conversion (None = no
    /// adjustment). Scales each pixel's distance from the image mean;
    /// 2.0 doubles the spread, darkening faint ink on washed-out scans.
    #[serde(default)]
    pub contrast_factor: Option<f32>,

    /// Noise-reduction filter.
    #[serde(default = "default_denoise")]
    pub denoise: DenoiseFilter,

    /// Sigma for the Gaussian denoise filter.
    #[serde(default = "default_gaussian_sigma")]
    pub gaussian_sigma: f32,

    /// Window radius for the median denoise filter.
    #[serde(default = "default_median_radius")]
    pub median_radius: u32,

    /// Binarization policy.
    #[serde(default = "default_threshold_policy")]
    pub threshold: ThresholdPolicy,

    /// Threshold value used when `threshold` is `Fixed`.
    #[serde(default = "default_fixed_threshold")]
    pub fixed_threshold: u8,

    /// Recognition model hint.
    #[serde(default = "default_ocr_mode")]
    pub ocr_mode: OcrMode,

    /// Backend language spec for printed text.
    #[serde(default = "default_typed_language")]
    pub typed_language: String,

    /// Backend language spec for handwriting. Defaults to the typed model;
    /// point this at a dedicated handwriting traineddata where available.
    #[serde(default = "default_typed_language")]
    pub handwritten_language: String,

    /// Page segmentation mode hint for the backend (0-10, Tesseract
    /// numbering; 3 = fully automatic, 6 = single uniform block).
    #[serde(default = "default_psm")]
    pub psm: u8,

    /// Maximum recognition attempts per image when results look
    /// low-confidence.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Lexical filter strictness profile.
    #[serde(default = "default_strictness")]
    pub strictness: StrictnessProfile,

    /// Whether the density gate runs before OCR.
    #[serde(default = "default_true")]
    pub density_gate: bool,

    /// Minimum foreground-pixel fraction for an image to be considered to
    /// contain text.
    #[serde(default = "default_density_threshold")]
    pub density_threshold: f64,

    /// Prefix the CSV report with a UTF-8 byte-order marker so it
    /// round-trips cleanly in spreadsheet tools.
    #[serde(default)]
    pub write_bom: bool,

    /// Write the preprocessed form of the first processed image into the
    /// output directory for visual QA.
    #[serde(default)]
    pub save_preview: bool,
}

fn default_denoise() -> DenoiseFilter {
    DenoiseFilter::Gaussian
}

fn default_gaussian_sigma() -> f32 {
    1.0
}

fn default_median_radius() -> u32 {
    1
}

fn default_threshold_policy() -> ThresholdPolicy {
    ThresholdPolicy::Otsu
}

fn default_fixed_threshold() -> u8 {
    128
}

fn default_ocr_mode() -> OcrMode {
    OcrMode::Combined
}

fn default_typed_language() -> String {
    "eng".to_string()
}

fn default_psm() -> u8 {
    3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_strictness() -> StrictnessProfile {
    StrictnessProfile::Standard
}

fn default_true() -> bool {
    true
}

fn default_density_threshold() -> f64 {
    0.2
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resize_factor: None,
            contrast_factor: None,
            denoise: default_denoise(),
            gaussian_sigma: default_gaussian_sigma(),
            median_radius: default_median_radius(),
            threshold: default_threshold_policy(),
            fixed_threshold: default_fixed_threshold(),
            ocr_mode: default_ocr_mode(),
            typed_language: default_typed_language(),
            handwritten_language: default_typed_language(),
            psm: default_psm(),
            max_attempts: default_max_attempts(),
            strictness: default_strictness(),
            density_gate: true,
            density_threshold: default_density_threshold(),
            write_bom: false,
            save_preview: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&content).map_err(|e| {
            ScanscribeError::validation(format!("Invalid config file '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if let Some(factor) = self.resize_factor
            && factor <= 0.0
        {
            return Err(ScanscribeError::validation(format!(
                "resize_factor must be positive, got {}",
                factor
            )));
        }
        if let Some(factor) = self.contrast_factor
            && factor <= 0.0
        {
            return Err(ScanscribeError::validation(format!(
                "contrast_factor must be positive, got {}",
                factor
            )));
        }
        if self.gaussian_sigma <= 0.0 {
            return Err(ScanscribeError::validation(format!(
                "gaussian_sigma must be positive, got {}",
                self.gaussian_sigma
            )));
        }
        if self.median_radius == 0 {
            return Err(ScanscribeError::validation("median_radius must be at least 1"));
        }
        if self.psm > 10 {
            return Err(ScanscribeError::validation(format!(
                "psm must be in 0-10, got {}",
                self.psm
            )));
        }
        if self.max_attempts == 0 {
            return Err(ScanscribeError::validation("max_attempts must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.density_threshold) {
            return Err(ScanscribeError::validation(format!(
                "density_threshold must be in [0, 1], got {}",
                self.density_threshold
            )));
        }
        if self.typed_language.trim().is_empty() || self.handwritten_language.trim().is_empty() {
            return Err(ScanscribeError::validation(
                "language specs cannot be empty. Specify a valid code (e.g., 'eng')",
            ));
        }
        Ok(())
    }

    /// Backend language spec for the configured OCR mode.
    ///
    /// `Combined` joins the typed and handwritten specs with `+`, the
    /// multi-model syntax Tesseract understands, deduplicated so the
    /// default configuration yields a single model.
    pub fn language_spec(&self) -> String {
        match self.ocr_mode {
            OcrMode::Typed => self.typed_language.clone(),
            OcrMode::Handwritten => self.handwritten_language.clone(),
            OcrMode::Combined => {
                if self.typed_language == self.handwritten_language {
                    self.typed_language.clone()
                } else {
                    format!("{}+{}", self.typed_language, self.handwritten_language)
                }
            }
        }
    }
}
