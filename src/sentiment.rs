//! Sentiment primitives: the verdict type, the scorer seam, and a bundled
//! valence-lexicon scorer.
//!
//! The "pure" classes matter more than the compound value here: a text is
//! strictly positive when the scorer assigns it the entire positive share,
//! which is what a single emotionally loaded word produces.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

static LEXICON: Lazy<Arc<HashMap<String, f64>>> = Lazy::new(|| {
    let raw = include_str!("../data/sentiment_lexicon.json");
    Arc::new(serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon"))
});

// Intensity adjustments, same magnitudes as the common valence-aware scorers.
const BOOST_INCR: f64 = 0.293;
const BOOST_DECR: f64 = -0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

/// Output of a sentiment scorer. Shares sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentVerdict {
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }

    pub fn is_strictly_positive(&self) -> bool {
        self.positive == 1.0
    }

    pub fn is_strictly_negative(&self) -> bool {
        self.negative == 1.0
    }

    /// Pure-class polarity; anything with mixed mass is neutral.
    pub fn polarity(&self) -> Polarity {
        if self.is_strictly_negative() {
            Polarity::Negative
        } else if self.is_strictly_positive() {
            Polarity::Positive
        } else {
            Polarity::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    /// +1 / -1 / 0.
    pub fn sign(self) -> i64 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
            Polarity::Neutral => 0,
        }
    }
}

/// Deterministic text → verdict scorer.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> anyhow::Result<SentimentVerdict>;
}

/// Record-level sentiment score: compound rounded to 2 decimals.
pub fn sentiment_score(scorer: &dyn SentimentScorer, text: &str) -> anyhow::Result<f64> {
    Ok(round_to(scorer.score(text)?.compound, 2))
}

/// Valence-lexicon scorer with boosters, caps emphasis, negation and `but` shifts.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Arc<HashMap<String, f64>>,
}

impl LexiconScorer {
    /// Bundled lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.clone(),
        }
    }

    pub fn with_lexicon(lexicon: HashMap<String, f64>) -> Self {
        Self {
            lexicon: Arc::new(lexicon),
        }
    }

    /// Load a `{ "word": valence }` JSON lexicon. Keys are lower-cased.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading sentiment lexicon {}", path.display()))?;
        let lex: HashMap<String, f64> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing sentiment lexicon {}", path.display()))?;
        Ok(Self::with_lexicon(
            lex.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect(),
        ))
    }

    #[inline]
    fn word_valence(&self, w: &str) -> f64 {
        *self.lexicon.get(w).unwrap_or(&0.0)
    }

    fn valences(&self, words: &[&str]) -> Vec<f64> {
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_diff = is_cap_diff(words);
        let mut out = Vec::with_capacity(words.len());

        for (i, w) in words.iter().enumerate() {
            let lw = lowered[i].as_str();
            if booster(lw).is_some() {
                out.push(0.0);
                continue;
            }
            let mut v = self.word_valence(lw);
            if v == 0.0 {
                out.push(0.0);
                continue;
            }
            if cap_diff && is_all_caps(w) {
                v += CAPS_INCR * v.signum();
            }
            // boosters within the three preceding words, dampened by distance
            for (k, damp) in [(1usize, 1.0), (2, 0.95), (3, 0.9)] {
                if i >= k {
                    if let Some(b) = booster(lowered[i - k].as_str()) {
                        v += b * v.signum() * damp;
                    }
                }
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(lowered[i - k].as_str()));
            if negated {
                v *= NEGATION_SCALAR;
            }
            out.push(v);
        }

        // contrastive `but`: soften what came before, stress what follows
        if let Some(bi) = lowered.iter().position(|w| w == "but") {
            for (i, v) in out.iter_mut().enumerate() {
                if i < bi {
                    *v *= 0.5;
                } else if i > bi {
                    *v *= 1.5;
                }
            }
        }
        out
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> anyhow::Result<SentimentVerdict> {
        let words: Vec<&str> = tokenize(text).collect();
        if words.is_empty() {
            return Ok(SentimentVerdict::neutral());
        }
        let sentiments = self.valences(&words);

        let amp = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += amp;
        } else if sum < 0.0 {
            sum -= amp;
        }
        let compound = round_to(
            (sum / (sum * sum + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0),
            4,
        );

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &v in &sentiments {
            if v > 0.0 {
                pos_sum += v + 1.0;
            } else if v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += amp;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= amp;
        }
        let total = pos_sum + neg_sum.abs() + neu_count;

        Ok(SentimentVerdict {
            compound,
            positive: round_to((pos_sum / total).abs(), 3),
            negative: round_to((neg_sum / total).abs(), 3),
            neutral: round_to((neu_count / total).abs(), 3),
        })
    }
}

/// Whitespace words with surrounding punctuation trimmed; single characters dropped.
fn tokenize(s: &str) -> impl Iterator<Item = &str> + '_ {
    s.split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .filter(|w| w.chars().count() > 1)
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "nothing"
            | "nobody"
            | "none"
            | "neither"
            | "nor"
            | "without"
            | "cannot"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "don't"
            | "doesn't"
            | "didn't"
    ) || tok.ends_with("n't")
}

fn booster(tok: &str) -> Option<f64> {
    match tok {
        "absolutely" | "amazingly" | "completely" | "deeply" | "especially" | "extremely"
        | "fully" | "greatly" | "highly" | "hugely" | "incredibly" | "most" | "more" | "so"
        | "really" | "totally" | "truly" | "very" | "super" | "utterly" | "quite" => {
            Some(BOOST_INCR)
        }
        "barely" | "hardly" | "kinda" | "less" | "little" | "marginally" | "slightly"
        | "somewhat" | "sorta" | "partly" => Some(BOOST_DECR),
        _ => None,
    }
}

fn is_all_caps(w: &str) -> bool {
    w.chars().any(char::is_alphabetic) && !w.chars().any(char::is_lowercase)
}

/// True when some, but not all, words are written in capitals.
fn is_cap_diff(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_all_caps(w)).count();
    caps > 0 && caps < words.len()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep = text.matches('!').count().min(4) as f64 * 0.292;
    let qm = text.matches('?').count();
    let qm_amp = match qm {
        0 | 1 => 0.0,
        2 | 3 => qm as f64 * 0.18,
        _ => 0.96,
    };
    ep + qm_amp
}

#[inline]
pub(crate) fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_loaded_word_is_pure() {
        let s = LexiconScorer::new();
        assert!(s.score("love").unwrap().is_strictly_positive());
        assert!(s.score("hate").unwrap().is_strictly_negative());
        assert_eq!(s.score("line").unwrap().polarity(), Polarity::Neutral);
    }

    #[test]
    fn lexicon_file_replaces_bundled_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        fs::write(&path, r#"{"Zorp": 2.5, "meh": -1.0}"#).unwrap();

        let s = LexiconScorer::from_path(&path).unwrap();
        assert!(s.score("zorp").unwrap().is_strictly_positive());
        assert!(s.score("meh").unwrap().is_strictly_negative());
        // bundled entries are gone
        assert_eq!(s.score("love").unwrap().polarity(), Polarity::Neutral);
        assert_eq!(LexiconScorer::new().score("zorp").unwrap().polarity(), Polarity::Neutral);
    }

    #[test]
    fn bad_lexicon_file_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken_lexicon.json");
        fs::write(&path, r#"{"zorp": "very"}"#).unwrap();
        let msg = format!("{:#}", LexiconScorer::from_path(&path).unwrap_err());
        assert!(msg.contains("broken_lexicon.json"), "{msg}");

        let missing = dir.path().join("absent.json");
        let msg = format!("{:#}", LexiconScorer::from_path(&missing).unwrap_err());
        assert!(msg.contains("absent.json"), "{msg}");
    }

    #[test]
    fn shares_sum_to_one() {
        let s = LexiconScorer::new();
        let v = s.score("I love the rain but hate the cold").unwrap();
        let total = v.positive + v.negative + v.neutral;
        assert!((total - 1.0).abs() < 0.01, "{v:?}");
    }

    #[test]
    fn negation_flips_sign() {
        let s = LexiconScorer::new();
        let plain = s.score("this is good").unwrap().compound;
        let negated = s.score("this is not good").unwrap().compound;
        assert!(plain > 0.0);
        assert!(negated < 0.0);
    }

    #[test]
    fn exclamation_and_caps_add_emphasis() {
        let s = LexiconScorer::new();
        let calm = s.score("I love it").unwrap().compound;
        let loud = s.score("I LOVE it!!").unwrap().compound;
        assert!(loud > calm);
    }

    #[test]
    fn empty_text_is_neutral() {
        let v = LexiconScorer::new().score("   !  ").unwrap();
        assert_eq!(v, SentimentVerdict::neutral());
    }

    #[test]
    fn score_is_rounded_to_two_places() {
        let s = LexiconScorer::new();
        let x = sentiment_score(&s, "what a wonderful day").unwrap();
        assert_eq!(x, round_to(x, 2));
        assert!(x > 0.0);
    }
}
