// src/features/mod.rs
//! Per-record signal extractors, the corpus vocabulary miner and column normalization.

pub mod hashtag;
pub mod intensifier;
pub mod lexical;
pub mod normalize;
pub mod passive;
pub mod polarity;
pub mod pos_ratio;
pub mod skipgram;
pub mod vocabulary;

pub use hashtag::{extract_hashtags, hashtag_sentiment};
pub use intensifier::intensifier_counts;
pub use lexical::{count_elongated_words, count_mentions, count_punctuation, count_uppercase_tokens};
pub use normalize::{is_degenerate, normalize_column, ConstantColumnPolicy};
pub use passive::passive_aggressive_count;
pub use polarity::{polarity_flip, PolarityFlip};
pub use pos_ratio::pos_ratios;
pub use skipgram::{skip_gram_sentiment, skip_grams, SkipGrams};
pub use vocabulary::{
    mine_vocabulary, unigram_overlap, VocabularyCounts, VocabularyIndex,
    DEFAULT_FREQUENCY_THRESHOLD,
};
