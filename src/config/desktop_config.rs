use crate::domain::ml::feature_registry::DateFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use super::endpoint_config::FULL_MODEL_ENDPOINT;

/// Desktop predictor settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Endpoint definition whose artifact the form scores against
    pub endpoint: String,
    /// Overrides the endpoint's date format for the form only
    pub date_format: Option<DateFormat>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            endpoint: FULL_MODEL_ENDPOINT.to_string(),
            date_format: None,
        }
    }
}

impl DesktopConfig {
    pub fn from_env() -> Result<Self> {
        let date_format = match env::var("DESKTOP_DATE_FORMAT") {
            Ok(pattern) => Some(
                pattern
                    .parse::<DateFormat>()
                    .context("Failed to parse DESKTOP_DATE_FORMAT")?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            endpoint: env::var("DESKTOP_ENDPOINT")
                .unwrap_or_else(|_| FULL_MODEL_ENDPOINT.to_string()),
            date_format,
        })
    }
}
