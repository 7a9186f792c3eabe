//! Workload Advisor CLI
//!
//! Classifies workload snapshots and reports usage patterns, either
//! in-process or against a running workload-advisor service.

mod client;
mod commands;
mod config;
mod output;

use advisor_lib::WorkloadAdvisor;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{classify, config as config_cmd, load_snapshots, patterns, Backend};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Workload Advisor CLI
#[derive(Parser)]
#[command(name = "wla")]
#[command(author, version, about = "CLI for the Workload Advisor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via WLA_API_URL env var)
    #[arg(long, env = "WLA_API_URL")]
    pub api_url: Option<String>,

    /// Path to the CLI config file (defaults to ~/.config/wla/config.json)
    #[arg(long, env = "WLA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a snapshot, or a JSON array of snapshots
    Classify {
        /// Snapshot JSON file
        file: PathBuf,

        /// Send to the service instead of running locally
        #[arg(long)]
        remote: bool,
    },

    /// Analyze the usage patterns of a snapshot's CPU and memory series
    Patterns {
        /// Snapshot JSON file
        file: PathBuf,

        /// Send to the service instead of running locally
        #[arg(long)]
        remote: bool,
    },

    /// Print the effective advisor configuration
    Config {
        /// Show the service's configuration instead of the local one
        #[arg(long)]
        remote: bool,
    },
}

impl Commands {
    fn remote(&self) -> bool {
        match self {
            Commands::Classify { remote, .. }
            | Commands::Patterns { remote, .. }
            | Commands::Config { remote } => *remote,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let settings = config::Config::load(cli.config.as_deref())?;
    let format = cli.format.or(settings.default_format).unwrap_or_default();

    let backend = if cli.command.remote() {
        let api_url = cli
            .api_url
            .clone()
            .or_else(|| settings.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        tracing::debug!(%api_url, "Using remote advisor");
        Backend::Remote(client::ApiClient::new(&api_url)?)
    } else {
        Backend::Local(WorkloadAdvisor::new(settings.advisor_config()?))
    };

    match cli.command {
        Commands::Classify { file, .. } => {
            let snapshots = load_snapshots(&file)?;
            classify::classify(&backend, &snapshots, format).await?;
        }
        Commands::Patterns { file, .. } => {
            let snapshots = load_snapshots(&file)?;
            patterns::patterns(&backend, &snapshots, format).await?;
        }
        Commands::Config { .. } => {
            config_cmd::show_config(&backend).await?;
        }
    }

    Ok(())
}
