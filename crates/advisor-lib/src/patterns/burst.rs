//! Burst detection
//!
//! Bursts are contiguous runs above a dynamic threshold derived from a low
//! percentile baseline. Runs shorter than the minimum duration are noise.

use crate::config::DetectorConfig;
use crate::models::{series_values, MetricPoint};
use crate::stats::{mean, percentile};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One burst: start, end and peak value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub peak: f64,
}

impl BurstInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Burst activity analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BurstPattern {
    pub is_bursty: bool,
    pub burst_count: usize,
    pub avg_burst_duration_minutes: f64,
    /// Mean of peak / max(baseline, 1)
    pub avg_burst_intensity: f64,
    /// Mean gap between consecutive bursts
    pub avg_quiet_duration_hours: f64,
    pub burst_periods: Vec<BurstInterval>,
}

/// Analyze burst activity of a CPU series
pub fn analyze_bursts(series: &[MetricPoint], config: &DetectorConfig) -> BurstPattern {
    if series.len() < config.min_burst_samples {
        return BurstPattern::default();
    }

    let baseline = percentile(&series_values(series), config.burst_baseline_percentile);
    let threshold = (baseline * config.burst_multiplier).max(config.burst_floor);

    let mut bursts = Vec::new();
    let mut open: Option<(DateTime<Utc>, f64)> = None;

    for point in series {
        if point.value > threshold {
            open = match open {
                None => Some((point.timestamp, point.value)),
                Some((start, peak)) => Some((start, peak.max(point.value))),
            };
        } else if let Some((start, peak)) = open.take() {
            bursts.push(BurstInterval {
                start,
                end: point.timestamp,
                peak,
            });
        }
    }
    if let (Some((start, peak)), Some(last)) = (open, series.last()) {
        bursts.push(BurstInterval {
            start,
            end: last.timestamp,
            peak,
        });
    }

    let min_duration =
        Duration::try_minutes(config.min_burst_duration_minutes.max(0)).unwrap_or(Duration::MAX);
    bursts.retain(|b| b.duration() >= min_duration);

    if bursts.is_empty() {
        return BurstPattern::default();
    }

    let durations: Vec<f64> = bursts
        .iter()
        .map(|b| b.duration().num_seconds() as f64 / 60.0)
        .collect();
    let intensities: Vec<f64> = bursts.iter().map(|b| b.peak / baseline.max(1.0)).collect();
    let quiet: Vec<f64> = bursts
        .windows(2)
        .map(|w| (w[1].start - w[0].end).num_seconds() as f64 / 3600.0)
        .collect();

    let avg_burst_intensity = mean(&intensities);
    let avg_quiet_duration_hours = mean(&quiet);

    BurstPattern {
        is_bursty: bursts.len() >= config.min_burst_count
            && avg_burst_intensity > config.min_burst_intensity
            && avg_quiet_duration_hours > config.min_quiet_hours,
        burst_count: bursts.len(),
        avg_burst_duration_minutes: mean(&durations),
        avg_burst_intensity,
        avg_quiet_duration_hours,
        burst_periods: bursts,
    }
}
