//! Configuration management for the CLI

use crate::output::OutputFormat;
use advisor_lib::AdvisorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration, read from `~/.config/wla/config.json` unless overridden
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API endpoint URL
    pub api_url: Option<String>,
    /// Default output format
    pub default_format: Option<OutputFormat>,
    /// Threshold overrides for local analysis
    pub advisor: Option<AdvisorConfig>,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Advisor configuration used for local analysis
    pub fn advisor_config(&self) -> Result<AdvisorConfig> {
        let config = self.advisor.clone().unwrap_or_default();
        config
            .validate()
            .context("Invalid advisor section in config file")?;
        Ok(config)
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("wla").join("config.json"))
    }
}
