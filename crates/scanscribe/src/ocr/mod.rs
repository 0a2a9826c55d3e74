//! OCR backend abstraction and invocation strategy.
//!
//! Character recognition itself is delegated to an external backend behind
//! the [`OcrBackend`] trait; [`invoker`] wraps it with the
//! retry-on-low-confidence policy.

pub mod backend;
pub mod invoker;
pub mod tesseract;

pub use backend::OcrBackend;
pub use invoker::OcrInvoker;
pub use tesseract::TesseractBackend;
