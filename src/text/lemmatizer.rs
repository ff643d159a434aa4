//! Noun-default lemmatizer.
//!
//! Irregular plurals come from a small table; regular plurals are reduced by
//! suffix rules. Only lower-case ASCII words are touched, and every output is
//! a fixed point of the rules (lemmatizing twice equals lemmatizing once).

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Reduces a token to its dictionary base form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str) -> String;
}

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("lives", "life"),
        ("wolves", "wolf"),
        ("halves", "half"),
    ]
    .into_iter()
    .collect()
});

// words ending in `s` that are already base forms
static INVARIANT: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "news", "series", "species", "always", "perhaps", "sometimes", "whereas", "towards",
        "afterwards", "besides", "thanks", "yes", "does", "was", "has", "his", "its", "hers",
        "ours", "yours", "theirs", "this", "thus", "lens", "physics", "politics", "mathematics",
        "economics", "christmas", "diabetes", "means", "pants", "jeans", "glasses", "clothes",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleLemmatizer;

impl RuleLemmatizer {
    pub fn new() -> Self {
        Self
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        if !token.bytes().all(|b| b.is_ascii_lowercase()) {
            return token.to_string();
        }
        if let Some(base) = IRREGULAR.get(token) {
            return (*base).to_string();
        }
        if token.len() <= 3 || INVARIANT.contains(token) || !token.ends_with('s') {
            return token.to_string();
        }
        if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
            return token.to_string();
        }
        if token.len() > 4 && token.ends_with("ies") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        for suffix in ["sses", "ches", "shes", "xes", "zes"] {
            if token.ends_with(suffix) {
                return token[..token.len() - 2].to_string();
            }
        }
        token[..token.len() - 1].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lem(s: &str) -> String {
        RuleLemmatizer.lemmatize(s)
    }

    #[test]
    fn regular_plurals() {
        assert_eq!(lem("hours"), "hour");
        assert_eq!(lem("parties"), "party");
        assert_eq!(lem("boxes"), "box");
        assert_eq!(lem("churches"), "church");
        assert_eq!(lem("classes"), "class");
    }

    #[test]
    fn irregular_and_invariant() {
        assert_eq!(lem("children"), "child");
        assert_eq!(lem("news"), "news");
        assert_eq!(lem("glass"), "glass");
        assert_eq!(lem("status"), "status");
    }

    #[test]
    fn leaves_cased_and_short_tokens() {
        assert_eq!(lem("LOVE"), "LOVE");
        assert_eq!(lem("Hours"), "Hours");
        assert_eq!(lem("is"), "is");
        assert_eq!(lem("!"), "!");
    }

    #[test]
    fn idempotent() {
        for w in ["hours", "parties", "boxes", "classes", "children", "buses", "days"] {
            let once = lem(w);
            assert_eq!(lem(&once), once, "{w}");
        }
    }
}
