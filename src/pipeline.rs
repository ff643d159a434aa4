// src/pipeline.rs
//! Orchestration: mine the vocabulary, extract every record on blocking
//! workers, then normalize the assembled matrix.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::FeatureConfig;
use crate::corpus::{Label, Record};
use crate::error::{FeatureError, Result};
use crate::features::{
    count_elongated_words, count_mentions, count_punctuation, count_uppercase_tokens,
    hashtag_sentiment, intensifier_counts, mine_vocabulary, passive_aggressive_count,
    polarity_flip, pos_ratios, skip_gram_sentiment, unigram_overlap, ConstantColumnPolicy,
    VocabularyIndex,
};
use crate::matrix::{Column, FeatureMatrix, FeatureVector};
use crate::pos::{LexiconTagger, PosTagger};
use crate::segment::{HashtagSegmenter, ViterbiSegmenter};
use crate::sentiment::{sentiment_score, LexiconScorer, SentimentScorer};
use crate::text::{NormalizeOptions, TextNormalizer};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("features_records_total", "Records run through extraction.");
        describe_gauge!(
            "features_vocabulary_terms",
            "Mined common terms, per label."
        );
        describe_histogram!(
            "features_extract_ms",
            "Extraction time per worker chunk in milliseconds."
        );
        describe_counter!(
            "features_degenerate_columns_total",
            "Constant non-zero columns resolved by policy."
        );
    });
}

// Records are identified in logs by index and this digest, never by text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Shared, immutable collaborators. Built once per run.
#[derive(Clone)]
pub struct Toolkit {
    pub normalizer: TextNormalizer,
    pub scorer: Arc<dyn SentimentScorer>,
    pub tagger: Arc<dyn PosTagger>,
    pub segmenter: Arc<dyn HashtagSegmenter>,
}

impl Toolkit {
    /// Bundled tokenizer, lemmatizer, lexicon scorer, tagger and segmenter.
    pub fn builtin() -> Self {
        Self {
            normalizer: TextNormalizer::default(),
            scorer: Arc::new(LexiconScorer::new()),
            tagger: Arc::new(LexiconTagger::new()),
            segmenter: Arc::new(ViterbiSegmenter::new()),
        }
    }

    pub fn from_config(cfg: &FeatureConfig) -> anyhow::Result<Self> {
        let mut kit = Self::builtin();
        if let Some(path) = &cfg.lexicon_path {
            kit.scorer = Arc::new(LexiconScorer::from_path(path)?);
            info!(lexicon = %path.display(), "custom sentiment lexicon loaded");
        }
        Ok(kit)
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn HashtagSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

/// Per-record memo of normalized token streams, one per option set.
pub struct TokenCache<'a> {
    text: &'a str,
    normalizer: &'a TextNormalizer,
    variants: HashMap<NormalizeOptions, Rc<[String]>>,
}

impl<'a> TokenCache<'a> {
    pub fn new(text: &'a str, normalizer: &'a TextNormalizer) -> Self {
        Self {
            text,
            normalizer,
            variants: HashMap::new(),
        }
    }

    pub fn get(&mut self, opts: NormalizeOptions) -> Rc<[String]> {
        let (text, normalizer) = (self.text, self.normalizer);
        self.variants
            .entry(opts)
            .or_insert_with(|| normalizer.normalize(text, opts).into())
            .clone()
    }

    /// Number of distinct variants computed so far.
    pub fn computed(&self) -> usize {
        self.variants.len()
    }
}

/// Raw (un-normalized) features of one record plus its vocabulary overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFeatures {
    pub index: i64,
    pub row: FeatureVector,
    /// Substring counts for the column symbols and any configured extras.
    pub punctuation: BTreeMap<String, usize>,
    pub sarcastic_overlap: BTreeMap<String, usize>,
    pub non_sarcastic_overlap: BTreeMap<String, usize>,
}

impl RecordFeatures {
    pub fn label(&self) -> Label {
        self.row.label
    }
}

fn stage<T>(index: i64, extractor: &'static str, r: anyhow::Result<T>) -> Result<T> {
    r.map_err(|source| FeatureError::Extraction {
        index,
        extractor,
        source,
    })
}

const PUNCTUATION_COLUMNS: [Column; 3] =
    [Column::Exclamation, Column::QuestionMark, Column::Ellipsis];

/// Runs every extractor on one record. The punctuation columns always count
/// their own symbol; `punctuation` adds extra tallies to `RecordFeatures`.
pub fn extract_record(
    record: &Record,
    toolkit: &Toolkit,
    vocabulary: &VocabularyIndex,
    punctuation: &[String],
) -> Result<RecordFeatures> {
    let text = record.text.as_str();
    let idx = record.index;
    let scorer = toolkit.scorer.as_ref();
    let mut cache = TokenCache::new(text, &toolkit.normalizer);
    let clean = cache.get(NormalizeOptions::CLEAN);
    let mined = cache.get(NormalizeOptions::MINED);

    let mut row = FeatureVector::new(record.label);
    row.set(Column::UserMention, count_mentions(text) as f64);

    let mut symbols: Vec<&str> = PUNCTUATION_COLUMNS
        .iter()
        .filter_map(|c| c.symbol())
        .collect();
    symbols.extend(punctuation.iter().map(String::as_str));
    let punct = count_punctuation(text, &symbols);
    for column in PUNCTUATION_COLUMNS {
        let n = column.symbol().and_then(|s| punct.get(s)).copied().unwrap_or(0);
        row.set(column, n as f64);
    }

    row.set(Column::UpperCase, count_uppercase_tokens(&clean[..]) as f64);
    row.set(Column::RepeatLetters, count_elongated_words(text) as f64);

    let sentiment = stage(idx, "sentiment", sentiment_score(scorer, text))?;
    row.set(Column::SentimentScore, sentiment);
    row.set(
        Column::SentimentFlip,
        if sentiment != 0.0 { 1.0 } else { 0.0 },
    );

    let flip = stage(idx, "polarity_flip", polarity_flip(&clean[..], scorer))?;
    row.set(Column::PositiveWords, flip.positive as f64);
    row.set(Column::NegativeWords, flip.negative as f64);
    row.set(Column::PolarityFlip, flip.flips as f64);

    let tagger = toolkit.tagger.as_ref();
    let (nouns, verbs) = stage(idx, "pos_ratio", pos_ratios(&clean[..], tagger))?;
    row.set(Column::Nouns, nouns);
    row.set(Column::Verbs, verbs);

    let (pos_int, neg_int) =
        stage(idx, "intensifier", intensifier_counts(&clean[..], scorer))?;
    row.set(Column::PositiveIntensifier, pos_int as f64);
    row.set(Column::NegativeIntensifier, neg_int as f64);

    for (column, n, k) in [
        (Column::Bigrams, 2, 0),
        (Column::Trigrams, 3, 0),
        (Column::SkipBigrams, 2, 2),
    ] {
        let sum = stage(idx, "skip_gram", skip_gram_sentiment(&clean[..], n, k, scorer))?;
        row.set(column, sum as f64);
    }

    row.set(
        Column::PassiveAggressive,
        passive_aggressive_count(text, &toolkit.normalizer) as f64,
    );

    let hashtag = stage(
        idx,
        "hashtag",
        hashtag_sentiment(text, toolkit.segmenter.as_ref(), scorer),
    )?;
    row.set(Column::HashtagPolarity, hashtag);

    Ok(RecordFeatures {
        index: idx,
        row,
        punctuation: punct,
        sarcastic_overlap: unigram_overlap(&mined[..], &vocabulary.sarcastic_terms),
        non_sarcastic_overlap: unigram_overlap(&mined[..], &vocabulary.non_sarcastic_terms),
    })
}

/// Read-only state shared by every worker.
#[derive(Debug)]
pub struct Extractor {
    toolkit: Toolkit,
    vocabulary: VocabularyIndex,
    punctuation: Vec<String>,
}

impl Extractor {
    pub fn new(toolkit: Toolkit, vocabulary: VocabularyIndex, punctuation: Vec<String>) -> Self {
        Self {
            toolkit,
            vocabulary,
            punctuation,
        }
    }

    pub fn vocabulary(&self) -> &VocabularyIndex {
        &self.vocabulary
    }

    pub fn extract(&self, record: &Record) -> Result<RecordFeatures> {
        extract_record(record, &self.toolkit, &self.vocabulary, &self.punctuation).map_err(|e| {
            warn!(
                index = record.index,
                id = %anon_hash(&record.text),
                error = %e,
                "record extraction failed"
            );
            e
        })
    }
}

/// Extracts all records over `workers` contiguous chunks on the blocking
/// pool. Output order equals input order; the first failure aborts the run.
pub async fn extract_all(
    records: Arc<[Record]>,
    extractor: Arc<Extractor>,
    workers: usize,
) -> Result<Vec<RecordFeatures>> {
    ensure_metrics_described();
    let total = records.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, total);
    let chunk = total.div_ceil(workers);
    let abort = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::with_capacity(workers);
    for (n, start) in (0..total).step_by(chunk).enumerate() {
        let end = (start + chunk).min(total);
        let records = Arc::clone(&records);
        let extractor = Arc::clone(&extractor);
        let abort = Arc::clone(&abort);
        handles.push(tokio::task::spawn_blocking(move || {
            let t0 = Instant::now();
            let mut out = Vec::with_capacity(end - start);
            for record in &records[start..end] {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
                match extractor.extract(record) {
                    Ok(f) => out.push(f),
                    Err(e) => {
                        abort.store(true, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }
            let ms = t0.elapsed().as_secs_f64() * 1000.0;
            histogram!("features_extract_ms").record(ms);
            counter!("features_records_total").increment(out.len() as u64);
            debug!(chunk = n, records = out.len(), ms, "chunk extracted");
            Ok(out)
        }));
    }

    let mut out = Vec::with_capacity(total);
    let mut first_err = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(part)) => out.extend(part),
            Ok(Err(e)) => {
                first_err.get_or_insert(e);
            }
            Err(join) => {
                first_err.get_or_insert(FeatureError::Worker(join.to_string()));
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

/// Copies raw rows into a matrix and min-max scales it column-wise.
/// Returns the matrix and the columns resolved by `policy`.
pub fn build_matrix(
    features: &[RecordFeatures],
    policy: ConstantColumnPolicy,
) -> (FeatureMatrix, Vec<Column>) {
    ensure_metrics_described();
    let mut matrix = FeatureMatrix::from_rows(features.iter().map(|f| f.row.clone()).collect());
    let degenerate = matrix.normalize(policy);
    for column in &degenerate {
        debug!(column = column.name(), ?policy, "constant non-zero column");
    }
    counter!("features_degenerate_columns_total").increment(degenerate.len() as u64);
    (matrix, degenerate)
}

/// Everything a run produces before serialization.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub vocabulary: VocabularyIndex,
    pub features: Vec<RecordFeatures>,
    pub matrix: FeatureMatrix,
    pub degenerate: Vec<Column>,
}

/// Vocabulary mining, then per-record extraction, then normalization.
pub async fn run_pipeline(
    records: Vec<Record>,
    toolkit: Toolkit,
    cfg: &FeatureConfig,
) -> Result<PipelineOutput> {
    ensure_metrics_described();
    let records: Arc<[Record]> = records.into();

    let vocabulary = {
        let records = Arc::clone(&records);
        let normalizer = toolkit.normalizer.clone();
        let threshold = cfg.frequency_threshold;
        tokio::task::spawn_blocking(move || mine_vocabulary(&records, &normalizer, threshold))
            .await
            .map_err(|e| FeatureError::Worker(e.to_string()))?
    };
    gauge!("features_vocabulary_terms", "label" => "sarcastic")
        .set(vocabulary.sarcastic_terms.len() as f64);
    gauge!("features_vocabulary_terms", "label" => "non_sarcastic")
        .set(vocabulary.non_sarcastic_terms.len() as f64);
    info!(
        sarcastic = vocabulary.sarcastic_terms.len(),
        non_sarcastic = vocabulary.non_sarcastic_terms.len(),
        threshold = cfg.frequency_threshold,
        "vocabulary mined"
    );

    let extractor = Arc::new(Extractor::new(toolkit, vocabulary, cfg.punctuation.clone()));
    let workers = cfg.effective_workers();
    let features = extract_all(Arc::clone(&records), Arc::clone(&extractor), workers).await?;
    info!(records = features.len(), workers, "extraction finished");

    let (matrix, degenerate) = build_matrix(&features, cfg.constant_column);
    Ok(PipelineOutput {
        vocabulary: extractor.vocabulary().clone(),
        features,
        matrix,
        degenerate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentVerdict;

    fn rec(index: i64, label: Label, text: &str) -> Record {
        Record {
            index,
            label,
            text: text.to_string(),
        }
    }

    fn punctuation() -> Vec<String> {
        vec!["!".into(), "?".into(), "...".into()]
    }

    struct Failing;

    impl SentimentScorer for Failing {
        fn score(&self, _text: &str) -> anyhow::Result<SentimentVerdict> {
            anyhow::bail!("scorer offline")
        }
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("hello");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("hello"));
        assert_ne!(a, anon_hash("hello!"));
    }

    #[test]
    fn token_cache_computes_each_variant_once() {
        let n = TextNormalizer::default();
        let mut cache = TokenCache::new("Cats and dogs!", &n);
        let a = cache.get(NormalizeOptions::CLEAN);
        let b = cache.get(NormalizeOptions::CLEAN);
        assert!(Rc::ptr_eq(&a, &b));
        cache.get(NormalizeOptions::MINED);
        assert_eq!(cache.computed(), 2);
        assert_eq!(&*a, &["Cats".to_string(), "and".into(), "dog".into()]);
    }

    #[test]
    fn extracts_lexical_columns() {
        let kit = Toolkit::builtin();
        let r = rec(
            0,
            Label::Sarcastic,
            "I just LOVE waiting in line for 3 hours! #best day ever",
        );
        let f = extract_record(&r, &kit, &VocabularyIndex::default(), &punctuation()).unwrap();
        assert_eq!(f.row.get(Column::Exclamation), 1.0);
        assert_eq!(f.row.get(Column::QuestionMark), 0.0);
        assert!(f.row.get(Column::UpperCase) >= 1.0);
        assert_eq!(f.row.get(Column::PassiveAggressive), 0.0);
        assert!(f.row.get(Column::HashtagPolarity) > 0.0);
        assert_eq!(f.label(), Label::Sarcastic);
    }

    #[test]
    fn flip_indicator_tracks_rounded_sentiment() {
        let kit = Toolkit::builtin();
        let neutral = rec(1, Label::NonSarcastic, "the line");
        let vocab = VocabularyIndex::default();
        let f = extract_record(&neutral, &kit, &vocab, &punctuation()).unwrap();
        assert_eq!(f.row.get(Column::SentimentScore), 0.0);
        assert_eq!(f.row.get(Column::SentimentFlip), 0.0);

        let loaded = rec(2, Label::Sarcastic, "love it");
        let f = extract_record(&loaded, &kit, &vocab, &punctuation()).unwrap();
        assert!(f.row.get(Column::SentimentScore) > 0.0);
        assert_eq!(f.row.get(Column::SentimentFlip), 1.0);
    }

    #[test]
    fn overlap_uses_fully_cleaned_tokens() {
        let kit = Toolkit::builtin();
        let vocab = VocabularyIndex {
            sarcastic_terms: ["meeting".to_string()].into_iter().collect(),
            non_sarcastic_terms: ["the".to_string(), "walk".to_string()]
                .into_iter()
                .collect(),
        };
        let r = rec(3, Label::NonSarcastic, "The meetings, the walk.");
        let f = extract_record(&r, &kit, &vocab, &punctuation()).unwrap();
        assert_eq!(f.sarcastic_overlap.get("meeting"), Some(&1));
        // stopwords never survive the mined variant
        assert_eq!(f.non_sarcastic_overlap.len(), 1);
        assert_eq!(f.non_sarcastic_overlap.get("walk"), Some(&1));
    }

    #[test]
    fn collaborator_failure_names_record_and_extractor() {
        let kit = Toolkit::builtin().with_scorer(Arc::new(Failing));
        let r = rec(42, Label::Sarcastic, "anything");
        match extract_record(&r, &kit, &VocabularyIndex::default(), &punctuation()) {
            Err(FeatureError::Extraction {
                index, extractor, ..
            }) => {
                assert_eq!(index, 42);
                assert_eq!(extractor, "sentiment");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn extract_all_preserves_order_across_chunks() {
        let records: Vec<Record> = (0..17)
            .map(|i| {
                let label = if i % 2 == 0 { Label::Sarcastic } else { Label::NonSarcastic };
                rec(i, label, &"wow! ".repeat(i as usize))
            })
            .collect();
        let extractor = Arc::new(Extractor::new(
            Toolkit::builtin(),
            VocabularyIndex::default(),
            punctuation(),
        ));
        let out = extract_all(records.clone().into(), extractor, 4).await.unwrap();
        assert_eq!(out.len(), records.len());
        for (i, f) in out.iter().enumerate() {
            assert_eq!(f.index, i as i64);
            assert_eq!(f.row.get(Column::Exclamation), i as f64);
            assert_eq!(f.label(), records[i].label);
        }
    }

    #[tokio::test]
    async fn extract_all_fails_on_collaborator_error() {
        let kit = Toolkit::builtin().with_scorer(Arc::new(Failing));
        let extractor = Arc::new(Extractor::new(kit, VocabularyIndex::default(), punctuation()));
        let records: Arc<[Record]> =
            vec![rec(0, Label::Sarcastic, "x"), rec(1, Label::Sarcastic, "y")].into();
        let err = extract_all(records, extractor, 2).await.unwrap_err();
        assert!(matches!(err, FeatureError::Extraction { .. }));
    }

    #[tokio::test]
    async fn empty_corpus_yields_empty_matrix() {
        let out = run_pipeline(Vec::new(), Toolkit::builtin(), &FeatureConfig::default())
            .await
            .unwrap();
        assert!(out.matrix.is_empty());
        assert!(out.vocabulary.sarcastic_terms.is_empty());
    }
}
