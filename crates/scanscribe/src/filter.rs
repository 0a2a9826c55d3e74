//! Lexical filtering of raw OCR output.
//!
//! Reduces the backend's raw string to a sequence of dictionary-valid
//! words. Stages run in a fixed order: abbreviation guard, character-class
//! filter, tokenization, length filter, repetition/gibberish filter,
//! dictionary lookup, rejoin. Token order is preserved throughout; no
//! stage reorders.

use crate::config::StrictnessProfile;
use crate::lexicon::Dictionary;
use regex::Regex;

/// Longest token the filter lets through. OCR noise tends to smear
/// adjacent words into long runs; real words rarely exceed this.
const MAX_TOKEN_LEN: usize = 15;

/// Punctuation retained by the character-class filter.
const ALLOWED_PUNCTUATION: &[char] = &['.', ',', ';', '\'', '"', '?', '!', '-'];

/// Cleans raw OCR output into dictionary-valid words.
pub struct LexicalFilter {
    profile: StrictnessProfile,
    abbreviation: Regex,
}

impl LexicalFilter {
    pub fn new(profile: StrictnessProfile) -> Self {
        // A single letter, a period, then another letter. The trailing
        // letter is an OCR mis-expansion artifact ("U.S.D.A" smear) and
        // gets dropped, keeping the letter-period pair.
        let abbreviation = Regex::new(r"(^|[^A-Za-z])([A-Za-z]\.)[A-Za-z]").expect("abbreviation pattern is valid");
        Self { profile, abbreviation }
    }

    /// Run all cleaning stages over `raw`.
    ///
    /// Returns the surviving tokens joined with single spaces, in their
    /// original relative order. Empty output means no token survived; the
    /// caller records `No text detected` in that case.
    pub fn clean(&self, raw: &str, dictionary: &Dictionary) -> String {
        let guarded = self.strip_abbreviation_artifacts(raw);
        let narrowed = retain_allowed_chars(&guarded);

        let tokens: Vec<&str> = narrowed
            .split_whitespace()
            .filter(|token| self.token_length_ok(token))
            .filter(|token| !is_gibberish(token, self.profile))
            .filter(|token| dictionary.contains(token))
            .collect();

        tokens.join(" ")
    }

    /// Stage 1: drop the letter immediately following a single-letter-plus-
    /// period pair. Narrow heuristic for one OCR artifact, not general
    /// abbreviation handling.
    fn strip_abbreviation_artifacts(&self, text: &str) -> String {
        self.abbreviation.replace_all(text, "$1$2").into_owned()
    }

    fn token_length_ok(&self, token: &str) -> bool {
        let len = token.chars().count();
        len >= self.profile.min_token_len() && len <= MAX_TOKEN_LEN
    }
}

/// Stage 2: keep letters, digits, whitespace, and the allowed punctuation
/// set; drop everything else.
fn retain_allowed_chars(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c))
        .collect()
}

/// Stage 5: repetition and gibberish heuristics.
///
/// Rejects tokens with 3+ consecutive identical characters and purely
/// numeric tokens. The strict profile additionally rejects tokens made of
/// a single distinct character.
fn is_gibberish(token: &str, profile: StrictnessProfile) -> bool {
    if has_triple_repeat(token) {
        return true;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if profile == StrictnessProfile::Strict {
        let mut chars = token.chars();
        if let Some(first) = chars.next()
            && chars.all(|c| c == first)
        {
            return true;
        }
    }
    false
}

fn has_triple_repeat(token: &str) -> bool {
    let mut run = 1;
    let mut prev: Option<char> = None;
    for c in token.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            run = 1;
            prev = Some(c);
        }
    }
    false
}

/// Merge two whitespace-tokenized text blobs into one vocabulary string.
///
/// Order-preserving union: every token of `existing` in order, then the
/// first occurrence of each token of `new` not already seen. Duplicate
/// counts are discarded; this accumulates a vocabulary, it does not
/// reconstruct sentences.
pub fn merge_vocabulary(existing: &str, new: &str) -> String {
    let mut seen = ahash::AHashSet::new();
    let mut merged: Vec<&str> = Vec::new();

    for token in existing.split_whitespace().chain(new.split_whitespace()) {
        if seen.insert(token) {
            merged.push(token);
        }
    }

    merged.join(" ")
}
