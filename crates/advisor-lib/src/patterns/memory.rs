//! Memory utilization analysis

use super::trend::leak_rate;
use crate::config::DetectorConfig;
use crate::models::{series_values, MetricPoint};
use crate::stats::SeriesStats;
use serde::{Deserialize, Serialize};

/// Memory usage analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPattern {
    pub avg_utilization: f64,
    pub max_utilization: f64,
    pub min_utilization: f64,
    pub has_memory_leak: bool,
    pub leak_rate_percent_per_day: Option<f64>,
    /// Samples above the pressure threshold
    pub memory_pressure_events: usize,
    pub is_memory_stable: bool,
}

impl Default for MemoryPattern {
    fn default() -> Self {
        Self {
            avg_utilization: 0.0,
            max_utilization: 0.0,
            min_utilization: 0.0,
            has_memory_leak: false,
            leak_rate_percent_per_day: None,
            memory_pressure_events: 0,
            is_memory_stable: true,
        }
    }
}

/// Analyze a memory utilization series
pub fn analyze_memory(series: &[MetricPoint], config: &DetectorConfig) -> MemoryPattern {
    let values = series_values(series);
    let Some(stats) = SeriesStats::from_values(&values) else {
        return MemoryPattern::default();
    };

    let memory_pressure_events = values
        .iter()
        .filter(|v| **v > config.memory_pressure_percent)
        .count();
    let leak_rate_percent_per_day = leak_rate(series, config);

    MemoryPattern {
        avg_utilization: stats.mean,
        max_utilization: stats.max,
        min_utilization: stats.min,
        has_memory_leak: leak_rate_percent_per_day
            .map(|rate| rate > config.memory_leak_threshold)
            .unwrap_or(false),
        leak_rate_percent_per_day,
        memory_pressure_events,
        is_memory_stable: stats.std_dev < config.memory_stable_stddev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::{hourly, hourly_fn};

    #[test]
    fn test_empty_series_is_neutral() {
        let memory = analyze_memory(&[], &DetectorConfig::default());
        assert_eq!(memory, MemoryPattern::default());
        assert!(memory.is_memory_stable);
    }

    #[test]
    fn test_pressure_events_counted() {
        let memory = analyze_memory(&hourly(&[50.0, 91.0, 95.0, 90.0]), &DetectorConfig::default());

        assert_eq!(memory.memory_pressure_events, 2);
        assert_eq!(memory.max_utilization, 95.0);
        assert_eq!(memory.min_utilization, 50.0);
        assert!(!memory.is_memory_stable);
    }

    #[test]
    fn test_steady_leak_detected() {
        let series = hourly_fn(24 * 14, |i| 20.0 + (i / 24) as f64 * 2.0);
        let memory = analyze_memory(&series, &DetectorConfig::default());

        assert!(memory.has_memory_leak);
        assert!((memory.leak_rate_percent_per_day.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_slow_growth_reported_but_not_a_leak() {
        let series = hourly_fn(24 * 14, |i| 40.0 + (i / 24) as f64 * 0.8);
        let memory = analyze_memory(&series, &DetectorConfig::default());

        assert!(!memory.has_memory_leak);
        assert!(memory.leak_rate_percent_per_day.is_some());
        assert!(memory.is_memory_stable);
    }
}
