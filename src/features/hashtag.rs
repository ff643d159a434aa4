//! Hashtag sentiment: segment each tag into words, score the phrase, negate
//! when the phrase contains `not`, average over the record's tags.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::segment::HashtagSegmenter;
use crate::sentiment::{round_to, SentimentScorer};

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([a-zA-Z0-9]{1,25})").expect("hashtag regex"));

/// Tag bodies (without `#`) in order of appearance, duplicates kept.
pub fn extract_hashtags(text: &str) -> Vec<&str> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Mean (possibly negated) compound score of all hashtags, 2 decimals; 0 without tags.
pub fn hashtag_sentiment(
    text: &str,
    segmenter: &dyn HashtagSegmenter,
    scorer: &dyn SentimentScorer,
) -> anyhow::Result<f64> {
    let tags = extract_hashtags(text);
    if tags.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for tag in &tags {
        let words = segmenter.segment(tag)?;
        let compound = scorer.score(&words.join(" "))?.compound;
        total += if words.iter().any(|w| w == "not") {
            -compound
        } else {
            compound
        };
    }
    Ok(round_to(total / tags.len() as f64, 2))
}
