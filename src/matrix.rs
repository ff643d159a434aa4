// src/matrix.rs
//! Fixed-width feature rows and the column-homogeneous matrix built from them.

use crate::corpus::Label;
use crate::features::{is_degenerate, normalize_column, ConstantColumnPolicy};

/// Number of feature columns after `label`.
pub const FEATURE_COUNT: usize = 20;

/// Output columns in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Label,
    UserMention,
    Exclamation,
    QuestionMark,
    Ellipsis,
    UpperCase,
    RepeatLetters,
    SentimentScore,
    PositiveWords,
    NegativeWords,
    PolarityFlip,
    Nouns,
    Verbs,
    PositiveIntensifier,
    NegativeIntensifier,
    Bigrams,
    Trigrams,
    SkipBigrams,
    PassiveAggressive,
    SentimentFlip,
    HashtagPolarity,
}

impl Column {
    pub const ALL: [Column; FEATURE_COUNT + 1] = [
        Column::Label,
        Column::UserMention,
        Column::Exclamation,
        Column::QuestionMark,
        Column::Ellipsis,
        Column::UpperCase,
        Column::RepeatLetters,
        Column::SentimentScore,
        Column::PositiveWords,
        Column::NegativeWords,
        Column::PolarityFlip,
        Column::Nouns,
        Column::Verbs,
        Column::PositiveIntensifier,
        Column::NegativeIntensifier,
        Column::Bigrams,
        Column::Trigrams,
        Column::SkipBigrams,
        Column::PassiveAggressive,
        Column::SentimentFlip,
        Column::HashtagPolarity,
    ];

    /// Header name as written to the feature file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Label => "label",
            Column::UserMention => "User mention",
            Column::Exclamation => "Exclamation",
            Column::QuestionMark => "Question mark",
            Column::Ellipsis => "Ellipsis",
            Column::UpperCase => "UpperCase",
            Column::RepeatLetters => "RepeatLetters",
            Column::SentimentScore => "SentimentScore",
            Column::PositiveWords => "positive word count",
            Column::NegativeWords => "negative word count",
            Column::PolarityFlip => "polarity flip",
            Column::Nouns => "Nouns",
            Column::Verbs => "Verbs",
            Column::PositiveIntensifier => "PositiveIntensifier",
            Column::NegativeIntensifier => "NegativeIntensifier",
            Column::Bigrams => "Bigrams",
            Column::Trigrams => "Trigram",
            Column::SkipBigrams => "Skipgrams",
            Column::PassiveAggressive => "Passive aggressive count",
            Column::SentimentFlip => "Emoji_tweet_polarity flip",
            Column::HashtagPolarity => "hashtag_polarity",
        }
    }

    /// Whether the column is min-max scaled across the corpus. Bounded and
    /// signed columns are written as extracted.
    pub fn normalized(self) -> bool {
        !matches!(
            self,
            Column::Label
                | Column::SentimentScore
                | Column::Nouns
                | Column::Verbs
                | Column::Bigrams
                | Column::Trigrams
                | Column::SkipBigrams
                | Column::SentimentFlip
                | Column::HashtagPolarity
        )
    }

    /// Literal symbol tallied into a punctuation column.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Column::Exclamation => Some("!"),
            Column::QuestionMark => Some("?"),
            Column::Ellipsis => Some("..."),
            _ => None,
        }
    }

    // position inside FeatureVector::values; None for the label
    fn slot(self) -> Option<usize> {
        (self as usize).checked_sub(1)
    }
}

pub fn header() -> Vec<&'static str> {
    Column::ALL.iter().map(|c| c.name()).collect()
}

/// One output row: the record label and twenty numeric features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub label: Label,
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn with(mut self, column: Column, value: f64) -> Self {
        self.set(column, value);
        self
    }

    /// Setting `Column::Label` is ignored; the label is typed.
    pub fn set(&mut self, column: Column, value: f64) {
        if let Some(i) = column.slot() {
            self.values[i] = value;
        }
    }

    pub fn get(&self, column: Column) -> f64 {
        match column.slot() {
            Some(i) => self.values[i],
            None => f64::from(self.label.as_u8()),
        }
    }

    /// Feature values in header order, label excluded.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }
}

/// Rows in corpus order; every row has the same column layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<FeatureVector>,
}

impl FeatureMatrix {
    pub fn from_rows(rows: Vec<FeatureVector>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(column)).collect()
    }

    /// Min-max scales every normalized column in place. Returns the columns
    /// that were constant and non-zero, i.e. resolved by `policy`.
    pub fn normalize(&mut self, policy: ConstantColumnPolicy) -> Vec<Column> {
        let mut degenerate = Vec::new();
        for column in Column::ALL.into_iter().filter(|c| c.normalized()) {
            let raw = self.column(column);
            if is_degenerate(&raw) {
                degenerate.push(column);
            }
            for (row, v) in self.rows.iter_mut().zip(normalize_column(&raw, policy)) {
                row.set(column, v);
            }
        }
        degenerate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_label_and_twenty_features() {
        let h = header();
        assert_eq!(h.len(), FEATURE_COUNT + 1);
        assert_eq!(h[0], "label");
        assert_eq!(h[7], "SentimentScore");
        assert_eq!(h[20], "hashtag_polarity");
    }

    #[test]
    fn slots_follow_header_order() {
        let mut v = FeatureVector::new(Label::Sarcastic);
        v.set(Column::UserMention, 4.0);
        v.set(Column::HashtagPolarity, -0.5);
        assert_eq!(v.values()[0], 4.0);
        assert_eq!(v.values()[FEATURE_COUNT - 1], -0.5);
        assert_eq!(v.get(Column::Label), 1.0);
    }

    #[test]
    fn normalize_skips_bounded_columns() {
        let rows = vec![
            FeatureVector::new(Label::Sarcastic)
                .with(Column::Exclamation, 4.0)
                .with(Column::SentimentScore, 0.9)
                .with(Column::Bigrams, 3.0),
            FeatureVector::new(Label::NonSarcastic)
                .with(Column::Exclamation, 0.0)
                .with(Column::SentimentScore, -0.2)
                .with(Column::Bigrams, -1.0),
        ];
        let mut m = FeatureMatrix::from_rows(rows);
        let degenerate = m.normalize(ConstantColumnPolicy::Zero);
        assert!(degenerate.is_empty());
        assert_eq!(m.column(Column::Exclamation), vec![1.0, 0.0]);
        assert_eq!(m.column(Column::SentimentScore), vec![0.9, -0.2]);
        assert_eq!(m.column(Column::Bigrams), vec![3.0, -1.0]);
        assert_eq!(m.column(Column::Label), vec![1.0, 0.0]);
    }

    #[test]
    fn constant_column_is_reported() {
        let rows = vec![
            FeatureVector::new(Label::Sarcastic).with(Column::UpperCase, 2.0),
            FeatureVector::new(Label::Sarcastic).with(Column::UpperCase, 2.0),
        ];
        let mut m = FeatureMatrix::from_rows(rows);
        assert_eq!(m.normalize(ConstantColumnPolicy::One), vec![Column::UpperCase]);
        assert_eq!(m.column(Column::UpperCase), vec![1.0, 1.0]);
    }
}
