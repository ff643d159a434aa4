//! Corpus-wide common vocabulary and per-record overlap with it.
//!
//! Mining is a fold: every record contributes its fully cleaned tokens to an
//! accumulator, and the accumulator is filtered by frequency once the whole
//! corpus has been seen. Counting is commutative, so corpus order does not
//! change the result.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::corpus::{Label, Record};
use crate::text::{NormalizeOptions, Stopwords, TextNormalizer};

pub const DEFAULT_FREQUENCY_THRESHOLD: u64 = 1000;

/// Label-conditioned high-frequency terms. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VocabularyIndex {
    pub sarcastic_terms: BTreeSet<String>,
    pub non_sarcastic_terms: BTreeSet<String>,
}

/// Per-label token frequencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyCounts {
    sarcastic: HashMap<String, u64>,
    non_sarcastic: HashMap<String, u64>,
}

impl VocabularyCounts {
    pub fn observe<I, S>(mut self, label: Label, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let counter = match label {
            Label::Sarcastic => &mut self.sarcastic,
            Label::NonSarcastic => &mut self.non_sarcastic,
        };
        for tok in tokens {
            *counter.entry(tok.into()).or_insert(0) += 1;
        }
        self
    }

    pub fn merge(mut self, other: Self) -> Self {
        for (w, n) in other.sarcastic {
            *self.sarcastic.entry(w).or_insert(0) += n;
        }
        for (w, n) in other.non_sarcastic {
            *self.non_sarcastic.entry(w).or_insert(0) += n;
        }
        self
    }

    pub fn count(&self, label: Label, word: &str) -> u64 {
        let counter = match label {
            Label::Sarcastic => &self.sarcastic,
            Label::NonSarcastic => &self.non_sarcastic,
        };
        counter.get(word).copied().unwrap_or(0)
    }

    /// Keeps words whose count strictly exceeds `threshold` and that are not stopwords.
    pub fn into_index(self, threshold: u64, stopwords: Stopwords) -> VocabularyIndex {
        let pick = |m: HashMap<String, u64>| -> BTreeSet<String> {
            m.into_iter()
                .filter(|(w, n)| *n > threshold && !stopwords.contains(w))
                .map(|(w, _)| w)
                .collect()
        };
        VocabularyIndex {
            sarcastic_terms: pick(self.sarcastic),
            non_sarcastic_terms: pick(self.non_sarcastic),
        }
    }
}

/// Single pass over the corpus with lemmatization, punctuation and stopword stripping.
pub fn mine_vocabulary(
    corpus: &[Record],
    normalizer: &TextNormalizer,
    threshold: u64,
) -> VocabularyIndex {
    corpus
        .iter()
        .fold(VocabularyCounts::default(), |acc, r| {
            acc.observe(r.label, normalizer.normalize(&r.text, NormalizeOptions::MINED))
        })
        .into_index(threshold, normalizer.stopwords())
}

/// Frequencies of the tokens that belong to `vocabulary`.
pub fn unigram_overlap<S: AsRef<str>>(
    tokens: &[S],
    vocabulary: &BTreeSet<String>,
) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for tok in tokens {
        let tok = tok.as_ref();
        if vocabulary.contains(tok) {
            *out.entry(tok.to_string()).or_insert(0) += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(index: i64, label: Label, text: &str) -> Record {
        Record {
            index,
            label,
            text: text.to_string(),
        }
    }

    fn corpus() -> Vec<Record> {
        vec![
            rec(0, Label::Sarcastic, "Great, more meetings. Love meetings!"),
            rec(1, Label::NonSarcastic, "The meeting went well."),
            rec(2, Label::Sarcastic, "Oh great, another meeting"),
            rec(3, Label::NonSarcastic, "Nice weather for a walk"),
        ]
    }

    #[test]
    fn counts_per_label_and_filters_by_threshold() {
        let n = TextNormalizer::default();
        let v = mine_vocabulary(&corpus(), &n, 1);
        // "meeting": 3 in sarcastic records, 1 in non-sarcastic
        assert!(v.sarcastic_terms.contains("meeting"));
        assert!(!v.non_sarcastic_terms.contains("meeting"));
        assert!(v.sarcastic_terms.iter().all(|w| !n.stopwords().contains(w)));
    }

    #[test]
    fn word_can_accumulate_under_both_labels() {
        let counts = VocabularyCounts::default()
            .observe(Label::Sarcastic, ["day", "day"])
            .observe(Label::NonSarcastic, ["day"]);
        assert_eq!(counts.count(Label::Sarcastic, "day"), 2);
        assert_eq!(counts.count(Label::NonSarcastic, "day"), 1);
        let idx = counts.into_index(1, Stopwords::english());
        assert!(idx.sarcastic_terms.contains("day"));
        assert!(idx.non_sarcastic_terms.is_empty());
    }

    #[test]
    fn order_independent() {
        let n = TextNormalizer::default();
        let forward = mine_vocabulary(&corpus(), &n, 0);
        let mut rev = corpus();
        rev.reverse();
        rev.swap(0, 2);
        assert_eq!(mine_vocabulary(&rev, &n, 0), forward);
    }

    #[test]
    fn merge_equals_single_fold() {
        let a = VocabularyCounts::default().observe(Label::Sarcastic, ["x", "y"]);
        let b = VocabularyCounts::default().observe(Label::Sarcastic, ["x"]);
        let merged = a.merge(b);
        assert_eq!(merged.count(Label::Sarcastic, "x"), 2);
        assert_eq!(merged.count(Label::Sarcastic, "y"), 1);
    }

    #[test]
    fn overlap_counts_only_vocabulary_tokens() {
        let vocab: BTreeSet<String> = ["meeting", "love"].iter().map(|s| s.to_string()).collect();
        let o = unigram_overlap(&["meeting", "Great", "meeting", "love"], &vocab);
        assert_eq!(o.get("meeting"), Some(&2));
        assert_eq!(o.get("love"), Some(&1));
        assert_eq!(o.len(), 2);
    }
}
