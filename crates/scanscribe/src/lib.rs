//! Scanscribe - Batch OCR Transcription
//!
//! Scanscribe turns a folder of scanned or photographed document images
//! into a structured transcript: for each image it runs optical character
//! recognition, cleans the recognized text against a dictionary, and emits
//! one row per file into a CSV report.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scanscribe::{run_batch, Dictionary, PipelineConfig, TesseractBackend};
//!
//! # fn main() -> scanscribe::Result<()> {
//! let config = PipelineConfig::default();
//! let backend = TesseractBackend::new();
//! let dictionary = Dictionary::bundled();
//! let report = run_batch("scans/", "out/", "transcriptions.csv", &config, &backend, &dictionary)?;
//! println!("Report written to {}", report.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Preprocessor** (`preprocess`): upscale, grayscale, contrast boost,
//!   denoise, binarize
//! - **Density Gate** (`density`): skip OCR on blank or non-text pages
//! - **OCR Invoker** (`ocr`): backend abstraction plus
//!   retry-on-low-confidence invocation
//! - **Lexical Filter** (`filter`): reduce raw OCR output to
//!   dictionary-valid words
//! - **Report Assembler** (`report`): deterministic, sorted CSV rows
//! - **Batch driver** (`batch`): sequential folder-to-report orchestration

#![deny(unsafe_code)]

pub mod batch;
pub mod config;
pub mod density;
pub mod error;
pub mod filter;
pub mod lexicon;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod report;

pub use batch::run_batch;
pub use config::{DenoiseFilter, OcrMode, PipelineConfig, StrictnessProfile, ThresholdPolicy};
pub use error::{Result, ScanscribeError};
pub use filter::{LexicalFilter, merge_vocabulary};
pub use lexicon::Dictionary;
pub use ocr::{OcrBackend, OcrInvoker, TesseractBackend};
pub use pipeline::Pipeline;
pub use report::{Report, Transcript, TranscriptRow};
