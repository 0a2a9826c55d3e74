//! Read-only word dictionary.
//!
//! Loaded once at startup and shared by reference across the run; never
//! mutated afterwards. Lookups are case-sensitive exactly as the words
//! were loaded.

use crate::error::Result;
use ahash::AHashSet;
use std::path::Path;

/// Word list bundled into the crate. Lowercase and capitalized forms of
/// common English words, one per line.
const BUNDLED_WORDS: &str = include_str!("../assets/words_en.txt");

/// Process-wide read-only word lookup.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: AHashSet<String>,
}

impl Dictionary {
    /// Build a dictionary from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a dictionary from a word list file: one word per line, blank
    /// lines and `#` comments skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(&content))
    }

    /// The English word list bundled with the crate.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_WORDS)
    }

    fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { words }
    }

    /// Case-sensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
