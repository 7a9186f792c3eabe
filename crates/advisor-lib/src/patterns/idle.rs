//! Idle period detection
//!
//! Single pass over the CPU series carrying an in-idle flag and the start
//! timestamp of the open interval.

use super::Interval;
use crate::config::DetectorConfig;
use crate::models::MetricPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Idle time analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlePattern {
    /// Share of samples below the idle threshold, 0-100
    pub idle_percent: f64,
    pub avg_idle_duration_hours: f64,
    pub max_idle_duration_hours: f64,
    pub idle_periods: Vec<Interval>,
    pub is_idle_dominant: bool,
}

impl Default for IdlePattern {
    fn default() -> Self {
        Self {
            idle_percent: 0.0,
            avg_idle_duration_hours: 0.0,
            max_idle_duration_hours: 0.0,
            idle_periods: Vec::new(),
            is_idle_dominant: false,
        }
    }
}

/// Analyze idle stretches of a CPU series
pub fn analyze_idle(series: &[MetricPoint], config: &DetectorConfig) -> IdlePattern {
    let Some(last) = series.last() else {
        return IdlePattern::default();
    };

    let mut idle_periods = Vec::new();
    let mut open: Option<DateTime<Utc>> = None;
    let mut idle_count = 0usize;

    for point in series {
        if point.value < config.idle_threshold_cpu {
            idle_count += 1;
            if open.is_none() {
                open = Some(point.timestamp);
            }
        } else if let Some(start) = open.take() {
            idle_periods.push(Interval::new(start, point.timestamp));
        }
    }
    if let Some(start) = open {
        idle_periods.push(Interval::new(start, last.timestamp));
    }

    let idle_percent = idle_count as f64 / series.len() as f64 * 100.0;

    let durations: Vec<f64> = idle_periods.iter().map(Interval::hours).collect();
    let (avg_idle_duration_hours, max_idle_duration_hours) = if durations.is_empty() {
        (0.0, 0.0)
    } else {
        (
            crate::stats::mean(&durations),
            durations.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    };

    IdlePattern {
        idle_percent,
        avg_idle_duration_hours,
        max_idle_duration_hours,
        idle_periods,
        is_idle_dominant: idle_percent > config.idle_dominant_percent,
    }
}
