//! Stateless surface counters over raw text or tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[a-zA-Z0-9]{1,15}").expect("mention regex"));

/// `@` followed by 1–15 alphanumerics, non-overlapping, left to right.
pub fn count_mentions(text: &str) -> usize {
    MENTION_RE.find_iter(text).count()
}

/// Literal (substring) occurrences of each symbol; multi-character symbols allowed.
pub fn count_punctuation<S: AsRef<str>>(text: &str, symbols: &[S]) -> BTreeMap<String, usize> {
    symbols
        .iter()
        .map(|s| {
            let s = s.as_ref();
            let n = if s.is_empty() { 0 } else { text.matches(s).count() };
            (s.to_string(), n)
        })
        .collect()
}

/// Tokens with at least one letter and no lower-case letters (`LOVE`, `I`, `3D`).
pub fn count_uppercase_tokens<S: AsRef<str>>(tokens: &[S]) -> usize {
    tokens.iter().filter(|t| is_upper(t.as_ref())).count()
}

fn is_upper(tok: &str) -> bool {
    tok.chars().any(char::is_uppercase) && !tok.chars().any(char::is_lowercase)
}

/// Maximal runs of one repeated alphabetic character with length ≥ 3.
pub fn count_elongated_words(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        if run >= 3 && c.is_alphabetic() {
            count += 1;
        }
    }
    count
}
