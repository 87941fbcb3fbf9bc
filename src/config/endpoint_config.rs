//! Endpoint definitions: which artifact an endpoint serves and how it reads dates.

use crate::application::ml::scorer::ScorerKind;
use crate::domain::ml::feature_registry::DateFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const FULL_MODEL_ENDPOINT: &str = "mlstockprice";
pub const SIMPLE_MODEL_ENDPOINT: &str = "mlstockpricesimple";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub scorer: ScorerKind,
    pub artifact: PathBuf,
    #[serde(default)]
    pub date_format: DateFormat,
}

impl EndpointConfig {
    /// The two stock endpoints, driven by `MODEL_PATH`, `SIMPLE_MODEL_PATH` and `DATE_FORMAT`.
    pub fn defaults_from_env() -> Result<Vec<Self>> {
        let date_format = env::var("DATE_FORMAT")
            .unwrap_or_else(|_| DateFormat::DEFAULT.to_string())
            .parse::<DateFormat>()
            .context("Failed to parse DATE_FORMAT")?;

        let model_path = env::var("MODEL_PATH").unwrap_or_else(|_| "model.json".to_string());
        let simple_model_path =
            env::var("SIMPLE_MODEL_PATH").unwrap_or_else(|_| "simplemodel.json".to_string());

        Ok(vec![
            Self {
                name: FULL_MODEL_ENDPOINT.to_string(),
                scorer: ScorerKind::FullModel,
                artifact: PathBuf::from(model_path),
                date_format: date_format.clone(),
            },
            Self {
                name: SIMPLE_MODEL_ENDPOINT.to_string(),
                scorer: ScorerKind::LinearCoefficients,
                artifact: PathBuf::from(simple_model_path),
                date_format,
            },
        ])
    }
}
