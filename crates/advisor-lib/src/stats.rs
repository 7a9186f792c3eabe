//! Shared statistics helpers
//!
//! Scalar features computed once per snapshot and reused by the pattern
//! detector and the workload classifier so both read identical numbers.

use crate::models::{series_values, WorkloadSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Floor applied to means used as ratio denominators
pub const RATIO_DENOMINATOR_FLOOR: f64 = 0.1;

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (Bessel's correction), 0 below two samples
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Percentile with linear interpolation between the nearest order statistics
/// at rank `(n - 1) * p / 100`. Returns 0 for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (sorted.len() - 1) as f64 * p / 100.0;
    let lower = rank.floor() as usize;
    let upper = lower + 1;
    if upper >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Pearson correlation coefficient.
///
/// Returns 0 for mismatched or empty inputs and when either side has zero
/// variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut numerator = 0.0;
    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        numerator += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }

    if ss_x == 0.0 || ss_y == 0.0 {
        return 0.0;
    }
    numerator / (ss_x.sqrt() * ss_y.sqrt())
}

/// Ordinary least-squares fit of `values` against their index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, 0 when the values are constant
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y = slope * index + intercept`. `None` below two points.
pub fn linear_fit(values: &[f64]) -> Option<LinearFit> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len();
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }
    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, y) in values.iter().enumerate() {
        let predicted = slope * i as f64 + intercept;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Mean, extremes and dispersion of one series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl SeriesStats {
    /// `None` for an empty series
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self {
            mean: mean(values),
            max,
            min,
            std_dev: sample_std_dev(values),
            count: values.len(),
        })
    }
}

/// Scalar features derived once per snapshot.
///
/// Series-derived fields are `None` when the underlying series is empty;
/// consumers choose their own fallback for absent values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_stddev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_p50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_p95: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_idle_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_stddev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_in_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_in_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_out_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_out_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_read_ops_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_write_ops_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_write_ops_max: Option<f64>,
    /// cpu_max / max(cpu_avg, 0.1)
    pub burst_ratio: f64,
    /// cpu_stddev / max(cpu_avg, 0.1)
    pub variability_score: f64,
}

impl StatisticsSummary {
    /// Build the summary for a snapshot. CPU samples strictly below
    /// `idle_threshold` count as idle.
    pub fn from_snapshot(snapshot: &WorkloadSnapshot, idle_threshold: f64) -> Self {
        let mut summary = Self::default();

        let cpu = series_values(&snapshot.cpu_utilization);
        if let Some(s) = SeriesStats::from_values(&cpu) {
            let idle = cpu.iter().filter(|v| **v < idle_threshold).count();
            summary.cpu_avg = Some(s.mean);
            summary.cpu_max = Some(s.max);
            summary.cpu_min = Some(s.min);
            summary.cpu_stddev = Some(s.std_dev);
            summary.cpu_p50 = Some(percentile(&cpu, 50.0));
            summary.cpu_p95 = Some(percentile(&cpu, 95.0));
            summary.cpu_idle_percent = Some(idle as f64 / s.count as f64 * 100.0);
        }

        if let Some(s) = SeriesStats::from_values(&series_values(&snapshot.memory_utilization)) {
            summary.memory_avg = Some(s.mean);
            summary.memory_max = Some(s.max);
            summary.memory_min = Some(s.min);
            summary.memory_stddev = Some(s.std_dev);
        }

        if let Some(s) = SeriesStats::from_values(&series_values(&snapshot.network_in)) {
            summary.network_in_avg = Some(s.mean);
            summary.network_in_max = Some(s.max);
        }
        if let Some(s) = SeriesStats::from_values(&series_values(&snapshot.network_out)) {
            summary.network_out_avg = Some(s.mean);
            summary.network_out_max = Some(s.max);
        }

        if let Some(s) = SeriesStats::from_values(&series_values(&snapshot.disk_read_ops)) {
            summary.disk_read_ops_avg = Some(s.mean);
        }
        if let Some(s) = SeriesStats::from_values(&series_values(&snapshot.disk_write_ops)) {
            summary.disk_write_ops_avg = Some(s.mean);
            summary.disk_write_ops_max = Some(s.max);
        }

        // An empty CPU series reads as mean 1 so both ratios collapse to 0.
        let denominator = summary.cpu_avg.unwrap_or(1.0).max(RATIO_DENOMINATOR_FLOOR);
        summary.burst_ratio = summary.cpu_max.unwrap_or(0.0) / denominator;
        summary.variability_score = summary.cpu_stddev.unwrap_or(0.0) / denominator;

        summary
    }

    /// Flatten into a name → value mapping of the features that are present
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let optional = [
            ("cpu_avg", self.cpu_avg),
            ("cpu_max", self.cpu_max),
            ("cpu_min", self.cpu_min),
            ("cpu_stddev", self.cpu_stddev),
            ("cpu_p50", self.cpu_p50),
            ("cpu_p95", self.cpu_p95),
            ("cpu_idle_percent", self.cpu_idle_percent),
            ("memory_avg", self.memory_avg),
            ("memory_max", self.memory_max),
            ("memory_min", self.memory_min),
            ("memory_stddev", self.memory_stddev),
            ("network_in_avg", self.network_in_avg),
            ("network_in_max", self.network_in_max),
            ("network_out_avg", self.network_out_avg),
            ("network_out_max", self.network_out_max),
            ("disk_read_ops_avg", self.disk_read_ops_avg),
            ("disk_write_ops_avg", self.disk_write_ops_avg),
            ("disk_write_ops_max", self.disk_write_ops_max),
        ];

        let mut map: BTreeMap<&'static str, f64> = optional
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect();
        map.insert("burst_ratio", self.burst_ratio);
        map.insert("variability_score", self.variability_score);
        map
    }
}
