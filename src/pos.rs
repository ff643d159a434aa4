//! Part-of-speech tagging with Penn Treebank tags.
//!
//! The bundled tagger is lexicon + suffix driven: closed-class words come from
//! a fixed table, frequent verbs from a second table, the rest is guessed from
//! shape and suffix, then two contextual fixes are applied.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Tags an ordered token sequence; output has one tag per input token.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> anyhow::Result<Vec<(String, String)>>;
}

pub const NOUN_TAGS: [&str; 4] = ["NN", "NNS", "NNP", "NNPS"];
pub const VERB_TAGS: [&str; 6] = ["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"];

pub fn is_noun_tag(tag: &str) -> bool {
    NOUN_TAGS.contains(&tag)
}

pub fn is_verb_tag(tag: &str) -> bool {
    VERB_TAGS.contains(&tag)
}

static CLOSED_CLASS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for w in [
        "the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no",
        "all", "another",
    ] {
        m.insert(w, "DT");
    }
    for w in [
        "in", "on", "at", "for", "with", "of", "from", "by", "about", "into", "over", "under",
        "after", "before", "during", "through", "between", "against", "without", "because", "if",
        "while", "since", "until", "than", "as", "like", "upon", "around", "near",
    ] {
        m.insert(w, "IN");
    }
    for w in ["i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them"] {
        m.insert(w, "PRP");
    }
    for w in ["my", "your", "his", "its", "our", "their"] {
        m.insert(w, "PRP$");
    }
    for w in ["and", "or", "but", "nor", "yet"] {
        m.insert(w, "CC");
    }
    for w in [
        "can", "could", "will", "would", "shall", "should", "may", "might", "must", "ca", "wo",
    ] {
        m.insert(w, "MD");
    }
    for w in [
        "not", "n't", "just", "very", "so", "too", "also", "really", "never", "always", "ever",
        "already", "still", "again", "now", "then", "here", "there", "only", "even", "soon",
        "today", "tomorrow", "yesterday", "often", "quite",
    ] {
        m.insert(w, "RB");
    }
    for w in ["what", "who", "whom", "which"] {
        m.insert(w, "WP");
    }
    for w in ["when", "where", "why", "how"] {
        m.insert(w, "WRB");
    }
    m.insert("to", "TO");
    m.insert("there's", "EX");
    m.insert("oh", "UH");
    m.insert("yes", "UH");
    m.insert("lol", "UH");
    m
});

static VERBS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("is", "VBZ"), ("'s", "VBZ"), ("has", "VBZ"), ("does", "VBZ"), ("am", "VBP"),
        ("'m", "VBP"), ("are", "VBP"), ("'re", "VBP"), ("have", "VBP"), ("'ve", "VBP"),
        ("do", "VBP"), ("was", "VBD"), ("were", "VBD"), ("had", "VBD"), ("did", "VBD"),
        ("be", "VB"), ("been", "VBN"), ("being", "VBG"), ("get", "VB"), ("got", "VBD"),
        ("go", "VB"), ("went", "VBD"), ("gone", "VBN"), ("make", "VB"), ("made", "VBD"),
        ("say", "VB"), ("said", "VBD"), ("see", "VB"), ("saw", "VBD"), ("seen", "VBN"),
        ("know", "VB"), ("knew", "VBD"), ("think", "VB"), ("thought", "VBD"), ("take", "VB"),
        ("took", "VBD"), ("come", "VB"), ("came", "VBD"), ("want", "VB"), ("love", "VBP"),
        ("hate", "VBP"), ("need", "VB"), ("feel", "VB"), ("felt", "VBD"), ("let", "VB"),
        ("give", "VB"), ("gave", "VBD"), ("tell", "VB"), ("told", "VBD"), ("find", "VB"),
        ("found", "VBD"), ("keep", "VB"), ("kept", "VBD"), ("wait", "VB"), ("thank", "VB"),
        ("like", "VB"), ("enjoy", "VB"), ("work", "VB"), ("look", "VB"), ("put", "VB"),
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    fn guess(token: &str, first: bool) -> &'static str {
        let lower = token.to_lowercase();
        if let Some(&t) = CLOSED_CLASS.get(lower.as_str()) {
            return t;
        }
        if let Some(&t) = VERBS.get(lower.as_str()) {
            return t;
        }
        if token.chars().any(|c| c.is_ascii_digit())
            && token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            return "CD";
        }
        if token.chars().all(|c| !c.is_alphanumeric()) {
            return match token {
                "." | "!" | "?" => ".",
                "," => ",",
                ":" | ";" | "..." => ":",
                "#" => "#",
                "$" => "$",
                _ => "SYM",
            };
        }
        let capitalized = token.chars().next().is_some_and(char::is_uppercase);
        if capitalized && !first {
            return if lower.ends_with('s') && lower.len() > 3 {
                "NNPS"
            } else {
                "NNP"
            };
        }
        if lower.ends_with("ing") && lower.len() > 4 {
            "VBG"
        } else if lower.ends_with("ed") && lower.len() > 3 {
            "VBD"
        } else if lower.ends_with("ly") && lower.len() > 3 {
            "RB"
        } else if ["ous", "ful", "able", "ible", "ive", "al", "ic", "less", "ish"]
            .iter()
            .any(|s| lower.ends_with(s))
            && lower.len() > 4
        {
            "JJ"
        } else if lower.ends_with("est") && lower.len() > 4 {
            "JJS"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            "NNS"
        } else {
            "NN"
        }
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> anyhow::Result<Vec<(String, String)>> {
        let mut tags: Vec<&'static str> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| Self::guess(t, i == 0))
            .collect();

        for i in 1..tags.len() {
            let prev = tags[i - 1];
            let lower = tokens[i].to_lowercase();
            let open_class = !CLOSED_CLASS.contains_key(lower.as_str());
            if (prev == "TO" || prev == "MD") && matches!(tags[i], "NN" | "VBP") && open_class {
                tags[i] = "VB";
            } else if prev == "PRP" && tags[i] == "NN" && open_class {
                tags[i] = "VBP";
            }
        }

        Ok(tokens
            .iter()
            .cloned()
            .zip(tags.into_iter().map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(s: &str) -> Vec<String> {
        let toks: Vec<String> = s.split_whitespace().map(str::to_string).collect();
        LexiconTagger
            .tag(&toks)
            .unwrap()
            .into_iter()
            .map(|(_, t)| t)
            .collect()
    }

    #[test]
    fn tags_simple_sentence() {
        assert_eq!(
            tags("The weather is nice today"),
            vec!["DT", "NN", "VBZ", "NN", "RB"]
        );
    }

    #[test]
    fn contextual_fixes() {
        assert_eq!(tags("I want to eat"), vec!["PRP", "VB", "TO", "VB"]);
        assert_eq!(tags("we walk"), vec!["PRP", "VBP"]);
    }

    #[test]
    fn shape_rules() {
        assert_eq!(tags("waiting 3 hours"), vec!["VBG", "CD", "NNS"]);
        assert_eq!(tags("see London"), vec!["VB", "NNP"]);
        assert_eq!(tags("visit the Rockies"), vec!["NN", "DT", "NNPS"]);
    }

    #[test]
    fn punctuation_is_not_a_number() {
        assert_eq!(tags("... . , 3.5 1,000"), vec![":", ".", ",", "CD", "CD"]);
    }

    #[test]
    fn tag_sets() {
        assert!(is_noun_tag("NNPS"));
        assert!(!is_noun_tag("JJ"));
        assert!(is_verb_tag("VBN"));
        assert!(!is_verb_tag("MD"));
    }
}
