//! Text normalization: tokenize, then optionally drop punctuation and
//! stopwords, then optionally lemmatize.

pub mod lemmatizer;
pub mod stopwords;
pub mod tokenizer;

use std::sync::Arc;

pub use lemmatizer::{Lemmatizer, RuleLemmatizer};
pub use stopwords::Stopwords;
pub use tokenizer::{is_punctuation_token, RegexTokenizer, Tokenizer};

/// Which cleaning steps `TextNormalizer::normalize` applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NormalizeOptions {
    pub lemmatize: bool,
    pub strip_punctuation: bool,
    pub strip_stopwords: bool,
}

impl NormalizeOptions {
    /// Tokens only.
    pub const RAW: Self = Self {
        lemmatize: false,
        strip_punctuation: false,
        strip_stopwords: false,
    };
    /// Lemmatized, punctuation removed, stopwords kept.
    pub const CLEAN: Self = Self {
        lemmatize: true,
        strip_punctuation: true,
        strip_stopwords: false,
    };
    /// Lemmatized with punctuation and stopwords removed (vocabulary mining).
    pub const MINED: Self = Self {
        lemmatize: true,
        strip_punctuation: true,
        strip_stopwords: true,
    };
}

/// Stateless normalizer over shared, immutable collaborators.
#[derive(Clone)]
pub struct TextNormalizer {
    tokenizer: Arc<dyn Tokenizer>,
    lemmatizer: Arc<dyn Lemmatizer>,
    stopwords: Stopwords,
}

impl TextNormalizer {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        lemmatizer: Arc<dyn Lemmatizer>,
        stopwords: Stopwords,
    ) -> Self {
        Self {
            tokenizer,
            lemmatizer,
            stopwords,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    pub fn stopwords(&self) -> Stopwords {
        self.stopwords
    }

    pub fn normalize(&self, text: &str, opts: NormalizeOptions) -> Vec<String> {
        let mut tokens = self.tokenizer.tokenize(text);
        if opts.strip_punctuation {
            tokens.retain(|t| !is_punctuation_token(t));
        }
        if opts.strip_stopwords {
            tokens.retain(|t| !self.stopwords.contains_folded(t));
        }
        if opts.lemmatize {
            tokens = tokens
                .iter()
                .map(|t| self.lemmatizer.lemmatize(t))
                .collect();
        }
        tokens
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(
            Arc::new(RegexTokenizer::new()),
            Arc::new(RuleLemmatizer::new()),
            Stopwords::english(),
        )
    }
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_variant_drops_punctuation_and_lemmatizes() {
        let n = TextNormalizer::default();
        let out = n.normalize("Waiting 3 hours! #best days", NormalizeOptions::CLEAN);
        assert_eq!(out, vec!["Waiting", "3", "hour", "best", "day"]);
    }

    #[test]
    fn mined_variant_drops_stopwords_case_insensitively() {
        let n = TextNormalizer::default();
        let out = n.normalize("The weather is nice today.", NormalizeOptions::MINED);
        assert_eq!(out, vec!["weather", "nice", "today"]);
    }

    #[test]
    fn raw_variant_keeps_everything() {
        let n = TextNormalizer::default();
        let out = n.normalize("Fine.", NormalizeOptions::RAW);
        assert_eq!(out, vec!["Fine", "."]);
    }
}
