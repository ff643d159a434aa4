//! Tokens immediately followed by a strictly signed token.

use crate::sentiment::{Polarity, SentimentScorer};

/// `(positive_follow, negative_follow)`: for every token but the last, the
/// polarity of the next token is tallied.
pub fn intensifier_counts<S: AsRef<str>>(
    tokens: &[S],
    scorer: &dyn SentimentScorer,
) -> anyhow::Result<(usize, usize)> {
    let mut pos = 0;
    let mut neg = 0;
    for pair in tokens.windows(2) {
        if pair[0].as_ref().is_empty() {
            continue;
        }
        match scorer.score(pair[1].as_ref())?.polarity() {
            Polarity::Positive => pos += 1,
            Polarity::Negative => neg += 1,
            Polarity::Neutral => {}
        }
    }
    Ok((pos, neg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconScorer;

    #[test]
    fn counts_signed_successors() {
        let s = LexiconScorer::new();
        assert_eq!(
            intensifier_counts(&["so", "happy", "really", "awful", "day"], &s).unwrap(),
            (1, 1)
        );
    }

    #[test]
    fn first_token_is_never_counted() {
        let s = LexiconScorer::new();
        assert_eq!(intensifier_counts(&["love"], &s).unwrap(), (0, 0));
        assert_eq!(intensifier_counts(&["love", "it"], &s).unwrap(), (0, 0));
        assert_eq!(intensifier_counts::<&str>(&[], &s).unwrap(), (0, 0));
    }
}
