//! Configuration module for mlstockprice.
//!
//! Configuration is loaded either from environment variables or from a TOML
//! descriptor listing the endpoints to host, organized by concern: Endpoints,
//! Server, and Desktop.

mod desktop_config;
mod endpoint_config;
mod server_config;

pub use desktop_config::DesktopConfig;
pub use endpoint_config::{EndpointConfig, FULL_MODEL_ENDPOINT, SIMPLE_MODEL_ENDPOINT};
pub use server_config::ServerConfig;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn default_history_path() -> PathBuf {
    PathBuf::from("it/it.csv")
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "endpoint", default)]
    pub endpoints: Vec<EndpointConfig>,
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub desktop: DesktopConfig,
}

impl Config {
    /// Loads from `ENDPOINTS_CONFIG` when set, otherwise from individual variables.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = env::var("ENDPOINTS_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        let config = Self {
            endpoints: EndpointConfig::defaults_from_env()?,
            history_path: env::var("HISTORY_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_history_path()),
            server: ServerConfig::from_env(),
            desktop: DesktopConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read endpoints config {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid endpoints config {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            anyhow::bail!("At least one endpoint must be configured");
        }

        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.name.trim().is_empty() {
                anyhow::bail!("Endpoint names must not be empty");
            }
            if !seen.insert(endpoint.name.as_str()) {
                anyhow::bail!("Duplicate endpoint name: {}", endpoint.name);
            }
        }

        if self.endpoint(&self.desktop.endpoint).is_none() {
            anyhow::bail!(
                "Desktop endpoint '{}' is not among the configured endpoints",
                self.desktop.endpoint
            );
        }
        Ok(())
    }

    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// The endpoint definition the desktop form uses, with its date format override applied.
    pub fn desktop_endpoint(&self) -> Result<EndpointConfig> {
        let mut endpoint = self
            .endpoint(&self.desktop.endpoint)
            .cloned()
            .with_context(|| format!("Unknown desktop endpoint '{}'", self.desktop.endpoint))?;
        if let Some(format) = &self.desktop.date_format {
            endpoint.date_format = format.clone();
        }
        Ok(endpoint)
    }
}
