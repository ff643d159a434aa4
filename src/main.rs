//! Feature extraction binary entrypoint.
//! Loads `.env`, initializes tracing, reads the config and runs one extraction pass.

use sarcasm_features::{run, FeatureConfig, DEFAULT_LOG_FILTER};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ENV_LOG_JSON: &str = "FEATURES_LOG_JSON";

/// Compact logs by default; `FEATURES_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(ENV_LOG_JSON)
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; missing file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = FeatureConfig::from_toml()?;
    info!(
        dataset = %cfg.dataset_path.display(),
        output = %cfg.output_path.display(),
        workers = cfg.effective_workers(),
        "starting feature extraction"
    );

    match run(&cfg).await {
        Ok(summary) => {
            info!(
                records = summary.records,
                sarcastic_terms = summary.sarcastic_terms,
                non_sarcastic_terms = summary.non_sarcastic_terms,
                degenerate = ?summary.degenerate_columns,
                "done"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "feature extraction failed");
            Err(e)
        }
    }
}
