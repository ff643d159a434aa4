//! Noun and verb density from part-of-speech tags.

use crate::pos::{is_noun_tag, is_verb_tag, PosTagger};
use crate::sentiment::round_to;

/// `(noun_ratio, verb_ratio)`, each rounded to 2 decimals.
/// An empty token stream yields `(0.0, 0.0)`.
pub fn pos_ratios(tokens: &[String], tagger: &dyn PosTagger) -> anyhow::Result<(f64, f64)> {
    if tokens.is_empty() {
        return Ok((0.0, 0.0));
    }
    let tagged = tagger.tag(tokens)?;
    let nouns = tagged.iter().filter(|(_, t)| is_noun_tag(t)).count();
    let verbs = tagged.iter().filter(|(_, t)| is_verb_tag(t)).count();
    let total = tokens.len() as f64;
    Ok((
        round_to(nouns as f64 / total, 2),
        round_to(verbs as f64 / total, 2),
    ))
}
