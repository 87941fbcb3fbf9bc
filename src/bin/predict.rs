//! One-shot local invocation of a prediction endpoint.
//!
//! ```sh
//! cargo run --bin predict -- --endpoint mlstockpricesimple \
//!     --date 15/03/2023 --open 100 --high 105 --low 98
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use mlstockprice::application::ml::scorer::ScorerKind;
use mlstockprice::application::prediction_service::PredictionService;
use mlstockprice::config::{Config, EndpointConfig, SIMPLE_MODEL_ENDPOINT};
use mlstockprice::domain::ml::feature_registry::DateFormat;
use mlstockprice::domain::prediction::PredictionInput;
use mlstockprice::interfaces::http::PredictionResponse;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Endpoint definition to invoke
    #[arg(long, default_value = SIMPLE_MODEL_ENDPOINT)]
    endpoint: String,

    /// TOML endpoint descriptor; falls back to environment variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Score against this artifact instead of the endpoint's
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Artifact shape when --artifact is given
    #[arg(long)]
    scorer: Option<ScorerKind>,

    /// Override the endpoint's date format
    #[arg(long)]
    date_format: Option<DateFormat>,

    #[arg(long)]
    date: String,

    #[arg(long)]
    open: f64,

    #[arg(long)]
    high: f64,

    #[arg(long)]
    low: f64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    let mut endpoint: EndpointConfig = config
        .endpoint(&args.endpoint)
        .cloned()
        .with_context(|| format!("Unknown endpoint '{}'", args.endpoint))?;

    if let Some(artifact) = args.artifact {
        endpoint.artifact = artifact;
    }
    if let Some(scorer) = args.scorer {
        endpoint.scorer = scorer;
    }
    if let Some(format) = args.date_format {
        endpoint.date_format = format;
    }

    let service = PredictionService::from_config(&endpoint);
    let input = PredictionInput::new(args.date, args.open, args.high, args.low);
    let prediction = service.predict(&input)?;

    let response = PredictionResponse {
        result: vec![prediction.close],
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
