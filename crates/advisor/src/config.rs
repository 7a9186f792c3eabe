//! Service and advisor configuration loading

use advisor_lib::AdvisorConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Environment variable naming an optional advisor config file
pub const CONFIG_FILE_ENV: &str = "ADVISOR_CONFIG_FILE";

/// Service settings, from `ADVISOR_SERVICE_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted `/v1/classify/batch` request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Name attached to structured log events
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_port() -> u16 {
    8080
}

fn default_max_batch_size() -> usize {
    500
}

fn default_service_name() -> String {
    "workload-advisor".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_batch_size: default_max_batch_size(),
            service_name: default_service_name(),
        }
    }
}

impl ServiceConfig {
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("ADVISOR_SERVICE").try_parsing(true))
            .build()?
            .try_deserialize()
            .context("Invalid ADVISOR_SERVICE settings")
    }
}

/// Load advisor thresholds: optional file, then `ADVISOR__*` overrides.
///
/// Returns whether any external source was present alongside the config.
pub fn load_advisor_config() -> Result<(AdvisorConfig, bool)> {
    let mut builder = Config::builder();
    let file = std::env::var(CONFIG_FILE_ENV).ok();
    if let Some(path) = &file {
        builder = builder.add_source(File::with_name(path));
    }
    let source = builder
        .add_source(
            Environment::with_prefix("ADVISOR")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("classifier.periodicity.lags")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read advisor configuration")?;

    let customized = file.is_some() || std::env::vars().any(|(k, _)| k.starts_with("ADVISOR__"));
    Ok((parse_advisor_config(source)?, customized))
}

/// Deserialize and validate advisor thresholds from a built source
pub fn parse_advisor_config(source: Config) -> Result<AdvisorConfig> {
    let config: AdvisorConfig = source
        .try_deserialize()
        .context("Failed to parse advisor configuration")?;
    config.validate().context("Invalid advisor configuration")?;
    Ok(config)
}
