//! Pestmatch CLI entrypoint: ranks likely diseases for one set of field conditions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pestmatch::config::Config;
use pestmatch::knowledge::JsonFileStore;
use pestmatch::matching::{DiseaseMatcher, NumericParam, QueryParams, SymptomsParam};

#[derive(Parser)]
#[command(name = "pestmatch")]
#[command(version, about = "Rank likely crop diseases for field conditions")]
struct Cli {
    /// Crop to match against (case-insensitive)
    #[arg(long)]
    crop: String,

    /// Air temperature in °F
    #[arg(long, allow_hyphen_values = true)]
    temperature: Option<String>,

    /// Relative humidity in percent
    #[arg(long)]
    humidity: Option<String>,

    /// Observed symptoms, comma-separated
    #[arg(long)]
    symptoms: Option<String>,

    /// Knowledge-base export (overrides PESTMATCH_KB_PATH)
    #[arg(long)]
    kb: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays a clean JSON report.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env()?;
    if let Some(kb) = cli.kb {
        config.kb_path = kb;
    }
    config.validate()?;

    tracing::info!(
        kb_path = %config.kb_path.display(),
        ttl_secs = config.cache_ttl.as_secs(),
        max_results = config.max_results,
        "Pestmatch starting"
    );

    let store = JsonFileStore::new(config.kb_path.clone(), config.page_size);
    let matcher = DiseaseMatcher::from_config(store, &config);

    let params = QueryParams {
        crop_type: Some(cli.crop),
        temperature: cli.temperature.map(NumericParam::Text),
        humidity: cli.humidity.map(NumericParam::Text),
        symptoms: cli.symptoms.map(SymptomsParam::Csv),
    };

    let report = matcher.query(params).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to serialize match report")?;

    println!("{output}");
    Ok(())
}
