//! Core data models for the workload advisor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single utilization sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    /// Percentage (0-100) for CPU/memory, raw magnitude for network and disk
    pub value: f64,
}

impl MetricPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Time series ordered ascending by timestamp.
///
/// Ordering is guaranteed by the caller; analyses never re-sort.
pub type MetricSeries = Vec<MetricPoint>;

/// Extract the raw values of a series
pub fn series_values(series: &[MetricPoint]) -> Vec<f64> {
    series.iter().map(|p| p.value).collect()
}

/// Historical utilization of one running workload plus placement context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub instance_id: String,
    pub instance_class: String,
    #[serde(default)]
    pub cpu_utilization: MetricSeries,
    #[serde(default)]
    pub memory_utilization: MetricSeries,
    #[serde(default)]
    pub network_in: MetricSeries,
    #[serde(default)]
    pub network_out: MetricSeries,
    #[serde(default)]
    pub disk_read_ops: MetricSeries,
    #[serde(default)]
    pub disk_write_ops: MetricSeries,
    /// A fixed public address is attached to the instance
    #[serde(default)]
    pub has_stable_address: bool,
    #[serde(default)]
    pub has_persistent_storage: bool,
    #[serde(default)]
    pub is_auto_scaled: bool,
    #[serde(default)]
    pub age_days: u32,
}

impl WorkloadSnapshot {
    pub fn new(instance_id: impl Into<String>, instance_class: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            instance_class: instance_class.into(),
            ..Default::default()
        }
    }

    pub fn with_cpu(mut self, series: MetricSeries) -> Self {
        self.cpu_utilization = series;
        self
    }

    pub fn with_memory(mut self, series: MetricSeries) -> Self {
        self.memory_utilization = series;
        self
    }

    pub fn with_network(mut self, network_in: MetricSeries, network_out: MetricSeries) -> Self {
        self.network_in = network_in;
        self.network_out = network_out;
        self
    }

    pub fn with_disk_ops(mut self, read_ops: MetricSeries, write_ops: MetricSeries) -> Self {
        self.disk_read_ops = read_ops;
        self.disk_write_ops = write_ops;
        self
    }

    /// Named view over every series, in a fixed order
    pub fn series(&self) -> [(&'static str, &[MetricPoint]); 6] {
        [
            ("cpu_utilization", &self.cpu_utilization),
            ("memory_utilization", &self.memory_utilization),
            ("network_in", &self.network_in),
            ("network_out", &self.network_out),
            ("disk_read_ops", &self.disk_read_ops),
            ("disk_write_ops", &self.disk_write_ops),
        ]
    }

    /// Check the caller-side contract before handing the snapshot to the core.
    ///
    /// Analyses assume sorted, finite series and do not check this themselves.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.instance_id.trim().is_empty() {
            return Err(SnapshotError::EmptyInstanceId);
        }

        for (name, series) in self.series() {
            for (index, point) in series.iter().enumerate() {
                if !point.value.is_finite() {
                    return Err(SnapshotError::NonFiniteValue {
                        series: name,
                        index,
                    });
                }
            }
            if let Some(index) = series
                .windows(2)
                .position(|w| w[1].timestamp < w[0].timestamp)
            {
                return Err(SnapshotError::UnsortedSeries {
                    series: name,
                    index: index + 1,
                });
            }
        }

        Ok(())
    }
}

/// Contract violations detected by [`WorkloadSnapshot::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("instance_id must not be empty")]
    EmptyInstanceId,

    #[error("series {series} is not sorted by timestamp (first offending sample at index {index})")]
    UnsortedSeries { series: &'static str, index: usize },

    #[error("series {series} has a non-finite value at index {index}")]
    NonFiniteValue { series: &'static str, index: usize },
}
