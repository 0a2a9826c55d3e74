//! OCR invocation with retry-on-low-confidence.
//!
//! The backend exposes no usable confidence score, so the invoker uses a
//! blunt proxy: the fraction of whitespace-delimited tokens that fail
//! dictionary lookup. Backends can be non-deterministic, so re-invoking on
//! the same image is worth a shot; the image is never re-preprocessed.

use super::backend::OcrBackend;
use crate::lexicon::Dictionary;
use image::GrayImage;
use tracing::{debug, warn};

/// Result fraction of out-of-dictionary tokens at or above which a retry
/// is attempted.
const LOW_CONFIDENCE_FRACTION: f64 = 0.5;

/// Wraps an [`OcrBackend`] with the bounded retry policy.
pub struct OcrInvoker<'a> {
    backend: &'a dyn OcrBackend,
    dictionary: &'a Dictionary,
}

impl<'a> OcrInvoker<'a> {
    pub fn new(backend: &'a dyn OcrBackend, dictionary: &'a Dictionary) -> Self {
        Self { backend, dictionary }
    }

    /// Recognize text, retrying while the result looks unreliable.
    ///
    /// Performs at most `max_attempts` backend calls. On exhaustion the
    /// last-obtained raw string is returned even if still low-confidence.
    /// Backend failures are logged and yield an empty string; they never
    /// propagate.
    pub fn recognize(&self, image: &GrayImage, language: &str, psm: u8, max_attempts: u32) -> String {
        let max_attempts = max_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=max_attempts {
            last = match self.backend.recognize_raw(image, language, psm) {
                Ok(text) => text,
                Err(err) => {
                    warn!(attempt, %err, "OCR backend invocation failed; recording empty result");
                    return String::new();
                }
            };

            let fraction = out_of_dictionary_fraction(&last, self.dictionary);
            if fraction < LOW_CONFIDENCE_FRACTION {
                return last;
            }
            if attempt < max_attempts {
                debug!(
                    attempt,
                    out_of_dictionary = fraction,
                    "low-confidence OCR result; retrying"
                );
            }
        }

        last
    }
}

/// Fraction of whitespace-delimited tokens absent from the dictionary.
///
/// A tokenless result counts as fully out-of-dictionary: an empty
/// recognition is as unreliable as one full of gibberish.
fn out_of_dictionary_fraction(text: &str, dictionary: &Dictionary) -> f64 {
    let mut total = 0u32;
    let mut misses = 0u32;
    for token in text.split_whitespace() {
        total += 1;
        if !dictionary.contains(token) {
            misses += 1;
        }
    }
    if total == 0 {
        return 1.0;
    }
    f64::from(misses) / f64::from(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScanscribeError};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that replays scripted responses and counts calls.
    struct ScriptedBackend {
        responses: Mutex<Vec<Result<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<String>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OcrBackend for ScriptedBackend {
        fn recognize_raw(&self, _image: &GrayImage, _language: &str, _psm: u8) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("gibberish zzz".to_string()))
        }
    }

    fn dict() -> Dictionary {
        Dictionary::from_words(["Hello", "World", "scan"])
    }

    fn blank_image() -> GrayImage {
        GrayImage::new(4, 4)
    }

    #[test]
    fn test_confident_result_returned_first_attempt() {
        let backend = ScriptedBackend::new(vec![Ok("Hello World".to_string())]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 3);
        assert_eq!(out, "Hello World");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_low_confidence_triggers_retry() {
        let backend = ScriptedBackend::new(vec![
            Ok("qqq www eee".to_string()),
            Ok("Hello World".to_string()),
        ]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 3);
        assert_eq!(out, "Hello World");
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn test_retry_bounded_by_max_attempts() {
        let backend = ScriptedBackend::new(vec![
            Ok("qqq".to_string()),
            Ok("www".to_string()),
            Ok("eee".to_string()),
            Ok("never reached".to_string()),
        ]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 3);
        // Last attempt's raw string comes back even though it is still
        // low-confidence.
        assert_eq!(out, "eee");
        assert_eq!(backend.calls(), 3);
    }

    #[test]
    fn test_exactly_half_out_of_dictionary_retries() {
        // 1 of 2 tokens unknown: fraction 0.5 is >= the cutoff.
        let backend = ScriptedBackend::new(vec![
            Ok("Hello qqzz".to_string()),
            Ok("Hello World".to_string()),
        ]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 3);
        assert_eq!(out, "Hello World");
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn test_backend_error_yields_empty_string() {
        let backend = ScriptedBackend::new(vec![Err(ScanscribeError::ocr("engine crashed"))]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 3);
        assert_eq!(out, "");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_empty_result_counts_as_low_confidence() {
        let backend = ScriptedBackend::new(vec![Ok(String::new()), Ok("Hello".to_string())]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 3);
        assert_eq!(out, "Hello");
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn test_zero_max_attempts_still_calls_once() {
        let backend = ScriptedBackend::new(vec![Ok("Hello".to_string())]);
        let d = dict();
        let invoker = OcrInvoker::new(&backend, &d);

        let out = invoker.recognize(&blank_image(), "eng", 3, 0);
        assert_eq!(out, "Hello");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_out_of_dictionary_fraction() {
        let d = dict();
        assert_eq!(out_of_dictionary_fraction("Hello World", &d), 0.0);
        assert_eq!(out_of_dictionary_fraction("Hello zz", &d), 0.5);
        assert_eq!(out_of_dictionary_fraction("zz yy", &d), 1.0);
        assert_eq!(out_of_dictionary_fraction("", &d), 1.0);
    }
}
