//! Error types for scanscribe.
//!
//! System errors (`Io`) always bubble up unchanged so callers can tell a
//! broken filesystem apart from a broken scan. Application errors carry a
//! message and an optional source chain.
//!
//! Per-file `Decode` and `Ocr` errors are not fatal to a batch run: the
//! batch driver converts them into status rows and moves on. Only failures
//! on the output side (creating the report directory, opening the CSV)
//! abort a run, since without those no report can be produced.

use thiserror::Error;

/// Result type alias using `ScanscribeError`.
pub type Result<T> = std::result::Result<T, ScanscribeError>;

/// Main error type for all scanscribe operations.
#[derive(Debug, Error)]
pub enum ScanscribeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl ScanscribeError {
    /// Create a `Decode` error without a source.
    pub fn decode(message: impl Into<String>) -> Self {
        ScanscribeError::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Create an `Ocr` error without a source.
    pub fn ocr(message: impl Into<String>) -> Self {
        ScanscribeError::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        ScanscribeError::Validation {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for ScanscribeError {
    fn from(err: image::ImageError) -> Self {
        ScanscribeError::Decode {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
