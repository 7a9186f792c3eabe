//! Subcommand implementations

pub mod classify;
pub mod config;
pub mod patterns;

use crate::client::ApiClient;
use advisor_lib::{WorkloadAdvisor, WorkloadSnapshot};
use anyhow::{Context, Result};
use std::path::Path;

/// Where analyses run
pub enum Backend {
    /// In-process, with the CLI's advisor configuration
    Local(WorkloadAdvisor),
    /// Forwarded to a running service
    Remote(ApiClient),
}

/// Read one snapshot, or a JSON array of snapshots, from `path`.
///
/// Every snapshot is validated before any analysis runs.
pub fn load_snapshots(path: &Path) -> Result<Vec<WorkloadSnapshot>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let snapshots = if value.is_array() {
        serde_json::from_value::<Vec<WorkloadSnapshot>>(value)
    } else {
        serde_json::from_value::<WorkloadSnapshot>(value).map(|s| vec![s])
    }
    .with_context(|| format!("{} does not contain workload snapshots", path.display()))?;

    for (i, snapshot) in snapshots.iter().enumerate() {
        snapshot
            .validate()
            .with_context(|| format!("workloads[{i}] ({})", snapshot.instance_id))?;
    }

    tracing::debug!(path = %path.display(), count = snapshots.len(), "Loaded snapshots");
    Ok(snapshots)
}
