// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod corpus;
pub mod error;
pub mod features;
pub mod matrix;
pub mod pipeline;
pub mod pos;
pub mod segment;
pub mod sentiment;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::config::FeatureConfig;
pub use crate::corpus::{Label, Record};
pub use crate::error::FeatureError;
pub use crate::matrix::{Column, FeatureMatrix, FeatureVector};
pub use crate::pipeline::{run_pipeline, PipelineOutput, RecordFeatures, Toolkit};

use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

/// `EnvFilter` directives used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "sarcasm_features=info,warn";

/// What a completed run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub sarcastic_terms: usize,
    pub non_sarcastic_terms: usize,
    pub degenerate_columns: Vec<&'static str>,
    pub output_path: PathBuf,
}

/// Load the corpus, extract and normalize features, write the matrix (and
/// the optional overlap/vocabulary files). Nothing is written if loading or
/// extraction fails.
pub async fn run(cfg: &FeatureConfig) -> anyhow::Result<RunSummary> {
    cfg.validate()?;
    let toolkit = Toolkit::from_config(cfg)?;
    run_with(cfg, toolkit).await
}

/// As [`run`], with caller-supplied collaborators.
pub async fn run_with(cfg: &FeatureConfig, toolkit: Toolkit) -> anyhow::Result<RunSummary> {
    let records = corpus::load_corpus(&cfg.dataset_path)
        .with_context(|| format!("loading corpus from {}", cfg.dataset_path.display()))?;
    info!(records = records.len(), "corpus loaded");

    let out = run_pipeline(records, toolkit, cfg).await?;

    corpus::write_matrix(&cfg.output_path, &out.matrix)
        .with_context(|| format!("writing feature matrix to {}", cfg.output_path.display()))?;
    info!(rows = out.matrix.len(), path = %cfg.output_path.display(), "feature matrix written");

    if let Some(path) = &cfg.overlap_path {
        let lines = out.features.iter().map(|f| corpus::OverlapLine {
            index: f.index,
            sarcastic: &f.sarcastic_overlap,
            non_sarcastic: &f.non_sarcastic_overlap,
        });
        corpus::write_overlaps(path, lines)
            .with_context(|| format!("writing unigram overlap to {}", path.display()))?;
        info!(path = %path.display(), "unigram overlap written");
    }
    if let Some(path) = &cfg.vocabulary_path {
        corpus::write_vocabulary(path, &out.vocabulary)
            .with_context(|| format!("writing vocabulary to {}", path.display()))?;
        info!(path = %path.display(), "vocabulary written");
    }

    Ok(RunSummary {
        records: out.matrix.len(),
        sarcastic_terms: out.vocabulary.sarcastic_terms.len(),
        non_sarcastic_terms: out.vocabulary.non_sarcastic_terms.len(),
        degenerate_columns: out.degenerate.iter().map(|c| c.name()).collect(),
        output_path: cfg.output_path.clone(),
    })
}
