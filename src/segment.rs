//! Hashtag word segmentation (`bestdayever` → `best day ever`).
//!
//! Minimum-cost segmentation over a ranked word list: a word at rank `r`
//! costs `ln(r · ln N)` (Zipf), unknown spans pay a flat premium plus a
//! per-character charge, and digit runs are cheap single words.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Best-effort compound splitting for hashtags.
pub trait HashtagSegmenter: Send + Sync {
    /// Returns the lower-cased words of `tag` in order.
    fn segment(&self, tag: &str) -> anyhow::Result<Vec<String>>;
}

const DIGIT_RUN_COST: f64 = 5.0;
const UNKNOWN_PREMIUM: f64 = 1.0;
const UNKNOWN_PER_CHAR: f64 = 2.0;

static WORD_COSTS: Lazy<Arc<WordCosts>> = Lazy::new(|| {
    let raw = include_str!("../data/segmenter_words.txt");
    Arc::new(WordCosts::from_ranked(raw.lines()))
});

#[derive(Debug)]
struct WordCosts {
    costs: HashMap<String, f64>,
    max_len: usize,
    max_cost: f64,
}

impl WordCosts {
    fn from_ranked<'a>(words: impl Iterator<Item = &'a str>) -> Self {
        let words: Vec<String> = words
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let log_n = (words.len().max(2) as f64).ln();
        let mut costs = HashMap::with_capacity(words.len());
        for (rank, w) in words.into_iter().enumerate() {
            let c = ((rank + 1) as f64 * log_n).ln();
            costs.entry(w).or_insert(c);
        }
        let max_len = costs.keys().map(|w| w.chars().count()).max().unwrap_or(1);
        let max_cost = costs.values().cloned().fold(0.0, f64::max);
        Self {
            costs,
            max_len,
            max_cost,
        }
    }

    fn cost(&self, w: &str, len: usize) -> f64 {
        if w.chars().all(|c| c.is_ascii_digit()) {
            return DIGIT_RUN_COST;
        }
        match self.costs.get(w) {
            Some(&c) => c,
            None => self.max_cost + UNKNOWN_PREMIUM + UNKNOWN_PER_CHAR * len as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViterbiSegmenter {
    words: Arc<WordCosts>,
}

impl ViterbiSegmenter {
    /// Bundled word list.
    pub fn new() -> Self {
        Self {
            words: WORD_COSTS.clone(),
        }
    }

    /// Words ordered from most to least frequent.
    pub fn from_ranked_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: Arc::new(WordCosts::from_ranked(words.into_iter())),
        }
    }
}

impl Default for ViterbiSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl HashtagSegmenter for ViterbiSegmenter {
    fn segment(&self, tag: &str) -> anyhow::Result<Vec<String>> {
        let chars: Vec<char> = tag.to_lowercase().chars().collect();
        let n = chars.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        // digit runs and unknown spans may exceed the longest dictionary word
        let span = self.words.max_len.max(n);

        // best[i] = (cost of chars[..i], start of last word)
        let mut best: Vec<(f64, usize)> = vec![(f64::INFINITY, 0); n + 1];
        best[0] = (0.0, 0);
        for i in 1..=n {
            for j in i.saturating_sub(span)..i {
                if !best[j].0.is_finite() {
                    continue;
                }
                let w: String = chars[j..i].iter().collect();
                let c = best[j].0 + self.words.cost(&w, i - j);
                if c < best[i].0 {
                    best[i] = (c, j);
                }
            }
        }

        let mut out = Vec::new();
        let mut i = n;
        while i > 0 {
            let j = best[i].1;
            out.push(chars[j..i].iter().collect::<String>());
            i = j;
        }
        out.reverse();
        Ok(out)
    }
}
