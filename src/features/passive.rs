//! Terse, period-terminated clauses ("Fine. Whatever.").

use crate::text::TextNormalizer;

/// Counts period-terminated clauses of one or two tokens.
///
/// The period is a hard delimiter. Text after the last period is never
/// examined, so a text without any period always yields 0.
pub fn passive_aggressive_count(text: &str, normalizer: &TextNormalizer) -> usize {
    let mut clauses: Vec<&str> = text.split('.').collect();
    // the final piece is not period-terminated
    clauses.pop();
    clauses
        .into_iter()
        .filter(|clause| (1..=2).contains(&normalizer.tokenize(clause).len()))
        .count()
}
