//! Pure-sentiment token counts and sign reversals between them.

use crate::sentiment::{Polarity, SentimentScorer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolarityFlip {
    pub positive: usize,
    pub negative: usize,
    pub flips: usize,
}

/// Walks tokens in order; a flip is a strictly-positive token after a
/// strictly-negative one (or vice versa). Repeats of one sign never flip.
pub fn polarity_flip<S: AsRef<str>>(
    tokens: &[S],
    scorer: &dyn SentimentScorer,
) -> anyhow::Result<PolarityFlip> {
    let mut out = PolarityFlip::default();
    let mut saw_positive = false;
    let mut saw_negative = false;

    for tok in tokens {
        match scorer.score(tok.as_ref())?.polarity() {
            Polarity::Negative => {
                out.negative += 1;
                saw_negative = true;
                if saw_positive {
                    out.flips += 1;
                    saw_positive = false;
                }
            }
            Polarity::Positive => {
                out.positive += 1;
                saw_positive = true;
                if saw_negative {
                    out.flips += 1;
                    saw_negative = false;
                }
            }
            Polarity::Neutral => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconScorer;

    #[test]
    fn alternating_words_flip_each_time() {
        let r = polarity_flip(&["love", "hate", "love"], &LexiconScorer::new()).unwrap();
        assert_eq!(
            r,
            PolarityFlip {
                positive: 2,
                negative: 1,
                flips: 2
            }
        );
    }

    #[test]
    fn same_sign_runs_do_not_double_count() {
        let r = polarity_flip(&["hate", "awful", "line", "love", "great"], &LexiconScorer::new())
            .unwrap();
        assert_eq!(r.negative, 2);
        assert_eq!(r.positive, 2);
        assert_eq!(r.flips, 1);
    }

    #[test]
    fn neutral_tokens_only() {
        let r = polarity_flip(&["the", "weather", "today"], &LexiconScorer::new()).unwrap();
        assert_eq!(r, PolarityFlip::default());
    }
}
