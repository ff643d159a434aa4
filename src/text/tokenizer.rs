//! Word-level tokenizer.
//!
//! Words, numbers and ellipses become single tokens; every other punctuation
//! character is its own token. Contractions are split into stem + clitic
//! (`don't` → `do`, `n't`; `it's` → `it`, `'s`).

use once_cell::sync::Lazy;
use regex::Regex;

/// Splits text into an ordered sequence of word-level tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?u)\.\.\.|\d+(?:[.,]\d+)+|\w+(?:[-']\w+)*|[^\w\s]").expect("tokenizer regex")
});

/// Regex-driven tokenizer with contraction splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for m in TOKEN_RE.find_iter(text) {
            let tok = m.as_str();
            match split_clitic(tok) {
                Some((stem, clitic)) => {
                    out.push(stem.to_string());
                    out.push(clitic.to_string());
                }
                None => out.push(tok.to_string()),
            }
        }
        out
    }
}

/// `can't` → (`ca`, `n't`), `they're` → (`they`, `'re`). Hyphenated words stay whole.
fn split_clitic(tok: &str) -> Option<(&str, &str)> {
    if !tok.contains('\'') {
        return None;
    }
    let lower = tok.to_ascii_lowercase();
    if lower.ends_with("n't") && tok.len() > 3 {
        let cut = tok.len() - 3;
        return Some((&tok[..cut], &tok[cut..]));
    }
    match tok.rfind('\'') {
        Some(pos) if pos > 0 => Some((&tok[..pos], &tok[pos..])),
        _ => None,
    }
}

/// True for tokens made of exactly one ASCII punctuation character.
pub fn is_punctuation_token(tok: &str) -> bool {
    let mut chars = tok.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}
