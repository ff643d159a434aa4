// src/config.rs
//! Run configuration: TOML file plus environment overrides.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

use crate::features::{ConstantColumnPolicy, DEFAULT_FREQUENCY_THRESHOLD};

// --- env defaults & names ---
pub const DEFAULT_FEATURES_CONFIG_PATH: &str = "config/features.toml";
pub const DEFAULT_DATASET_PATH: &str = "data/dataset.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/feature_list.csv";

pub const ENV_FEATURES_CONFIG_PATH: &str = "FEATURES_CONFIG_PATH";
pub const ENV_DATASET_PATH: &str = "FEATURES_DATASET_PATH";
pub const ENV_OUTPUT_PATH: &str = "FEATURES_OUTPUT_PATH";
pub const ENV_FREQUENCY_THRESHOLD: &str = "FEATURES_FREQUENCY_THRESHOLD";
pub const ENV_WORKERS: &str = "FEATURES_WORKERS";

fn default_dataset_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_PATH)
}
fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}
fn default_frequency_threshold() -> u64 {
    DEFAULT_FREQUENCY_THRESHOLD
}
fn default_punctuation() -> Vec<String> {
    vec!["!".into(), "?".into(), "...".into()]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// A mined term must occur strictly more often than this under its label.
    #[serde(default = "default_frequency_threshold")]
    pub frequency_threshold: u64,
    /// Symbols tallied by substring into `RecordFeatures::punctuation`. The
    /// Exclamation, Question mark and Ellipsis columns count `!`, `?` and
    /// `...` regardless of this list.
    #[serde(default = "default_punctuation")]
    pub punctuation: Vec<String>,
    #[serde(default)]
    pub constant_column: ConstantColumnPolicy,
    /// 0 = available parallelism.
    #[serde(default)]
    pub workers: usize,
    /// JSON `{word: valence}` replacing the bundled sentiment lexicon.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    #[serde(default)]
    pub overlap_path: Option<PathBuf>,
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            output_path: default_output_path(),
            frequency_threshold: default_frequency_threshold(),
            punctuation: default_punctuation(),
            constant_column: ConstantColumnPolicy::default(),
            workers: 0,
            lexicon_path: None,
            overlap_path: None,
            vocabulary_path: None,
        }
    }
}

fn parse_u64_env(name: &str, raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(env = name, value = %raw, "ignoring unparsable override");
            None
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl FeatureConfig {
    /// Load from `$FEATURES_CONFIG_PATH` or `config/features.toml`, then apply
    /// env overrides. A missing default file yields defaults; a missing
    /// explicitly named file is an error.
    pub fn from_toml() -> anyhow::Result<Self> {
        let explicit = non_empty_env(ENV_FEATURES_CONFIG_PATH).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FEATURES_CONFIG_PATH));

        let mut cfg = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content)
                .with_context(|| format!("invalid features config at {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound && explicit.is_none() => Self::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading features config at {}", path.display()))
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: FeatureConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Some(p) = non_empty_env(ENV_DATASET_PATH) {
            self.dataset_path = PathBuf::from(p);
        }
        if let Some(p) = non_empty_env(ENV_OUTPUT_PATH) {
            self.output_path = PathBuf::from(p);
        }
        if let Some(t) = parse_u64_env(
            ENV_FREQUENCY_THRESHOLD,
            std::env::var(ENV_FREQUENCY_THRESHOLD).ok(),
        ) {
            self.frequency_threshold = t;
        }
        if let Some(w) = parse_u64_env(ENV_WORKERS, std::env::var(ENV_WORKERS).ok()) {
            self.workers = w as usize;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.punctuation.iter().any(|s| s.is_empty()) {
            bail!("`punctuation` entries must be non-empty");
        }
        Ok(())
    }

    /// Worker count with 0 resolved to the host's parallelism.
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = FeatureConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, FeatureConfig::default());
        assert_eq!(cfg.frequency_threshold, 1000);
        assert_eq!(cfg.punctuation, vec!["!", "?", "..."]);
        assert_eq!(cfg.constant_column, ConstantColumnPolicy::Zero);
    }

    #[test]
    fn fields_parse() {
        let cfg = FeatureConfig::from_toml_str(
            r#"
            dataset_path = "in.csv"
            frequency_threshold = 5
            constant_column = "one"
            workers = 3
            overlap_path = "overlap.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.dataset_path, PathBuf::from("in.csv"));
        assert_eq!(cfg.frequency_threshold, 5);
        assert_eq!(cfg.constant_column, ConstantColumnPolicy::One);
        assert_eq!(cfg.effective_workers(), 3);
        assert_eq!(cfg.overlap_path, Some(PathBuf::from("overlap.jsonl")));
    }

    #[test]
    fn empty_punctuation_symbol_is_rejected() {
        assert!(FeatureConfig::from_toml_str(r#"punctuation = ["!", ""]"#).is_err());
        let cfg = FeatureConfig::from_toml_str("punctuation = []").unwrap();
        assert!(cfg.punctuation.is_empty());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(FeatureConfig::from_toml_str("treshold = 3").is_err());
    }

    #[test]
    fn u64_env_parse_ignores_garbage() {
        assert_eq!(parse_u64_env("X", Some(" 12 ".into())), Some(12));
        assert_eq!(parse_u64_env("X", Some("many".into())), None);
        assert_eq!(parse_u64_env("X", None), None);
    }

    #[test]
    fn zero_workers_resolves_to_parallelism() {
        assert!(FeatureConfig::default().effective_workers() >= 1);
    }
}
