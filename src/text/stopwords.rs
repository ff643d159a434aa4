//! English stopword set backed by the `stop-words` NLTK list.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

// NLTK English list (179 words, all lower-case).
static ENGLISH_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| get(LANGUAGE::English).iter().copied().collect());

/// Immutable stopword lookup shared by every normalizer.
#[derive(Debug, Clone, Copy)]
pub struct Stopwords {
    set: &'static HashSet<&'static str>,
}

impl Stopwords {
    pub fn english() -> Self {
        Self { set: &ENGLISH_SET }
    }

    /// Exact (case-sensitive) membership.
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word)
    }

    /// Membership after lower-casing `word`.
    pub fn contains_folded(&self, word: &str) -> bool {
        self.set.contains(word.to_lowercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_is_complete() {
        let sw = Stopwords::english();
        assert!(!sw.is_empty());
        assert_eq!(sw.len(), 179);
        for w in ["i", "you're", "the", "wouldn't", "ma"] {
            assert!(sw.contains(w), "{w}");
        }
    }

    #[test]
    fn folded_lookup_ignores_case() {
        let sw = Stopwords::english();
        assert!(sw.contains_folded("The"));
        assert!(!sw.contains("The"));
        assert!(!sw.contains_folded("weather"));
    }
}
