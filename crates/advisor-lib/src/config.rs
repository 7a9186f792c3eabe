//! Tunable thresholds and weights
//!
//! Every heuristic constant used by the detector and the classifier lives
//! here. Values are immutable once a detector or classifier is constructed.
//! All structs deserialize with `#[serde(default)]` so partial overrides
//! (a config file, environment variables) keep the remaining defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CPU percentage below which a sample counts as idle
pub const DEFAULT_IDLE_THRESHOLD_CPU: f64 = 5.0;

/// Complete advisor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub detector: DetectorConfig,
    pub classifier: ClassifierConfig,
}

impl AdvisorConfig {
    /// Reject configurations that would make the analyses meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detector;
        let c = &self.classifier;

        let non_negative = [
            ("detector.idle_threshold_cpu", d.idle_threshold_cpu),
            ("detector.idle_dominant_percent", d.idle_dominant_percent),
            ("detector.burst_multiplier", d.burst_multiplier),
            ("detector.burst_floor", d.burst_floor),
            ("detector.min_burst_intensity", d.min_burst_intensity),
            ("detector.min_quiet_hours", d.min_quiet_hours),
            ("detector.diurnal_significance", d.diurnal_significance),
            ("detector.weekly_significance", d.weekly_significance),
            ("detector.memory_pressure_percent", d.memory_pressure_percent),
            ("detector.memory_stable_stddev", d.memory_stable_stddev),
            ("detector.memory_leak_threshold", d.memory_leak_threshold),
            ("detector.trend_slope_threshold", d.trend_slope_threshold),
            ("classifier.idle_threshold_cpu", c.idle_threshold_cpu),
            ("classifier.alternative_min_score", c.alternative_min_score),
            (
                "classifier.periodicity.correlation_threshold",
                c.periodicity.correlation_threshold,
            ),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }

        if !(0.0..=100.0).contains(&d.burst_baseline_percentile) {
            return Err(ConfigError::InvalidValue {
                name: "detector.burst_baseline_percentile",
                value: d.burst_baseline_percentile,
            });
        }

        if c.periodicity.lags.iter().any(|lag| *lag == 0) {
            return Err(ConfigError::ZeroLag);
        }

        let bounded = [
            (
                "classifier.periodicity.lags",
                c.periodicity.lags.iter().copied().max().unwrap_or(1) as i128,
                MAX_PERIODICITY_LAG as i128,
            ),
            (
                "detector.min_burst_duration_minutes",
                d.min_burst_duration_minutes as i128,
                MAX_BURST_DURATION_MINUTES as i128,
            ),
            (
                "detector.projection_days",
                d.projection_days as i128,
                MAX_PROJECTION_DAYS as i128,
            ),
        ];
        for (name, value, max) in bounded {
            if !(0..=max).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value, max });
            }
        }

        if d.idle_threshold_cpu != c.idle_threshold_cpu {
            return Err(ConfigError::IdleThresholdMismatch {
                detector: d.idle_threshold_cpu,
                classifier: c.idle_threshold_cpu,
            });
        }

        Ok(())
    }
}

/// Longest periodicity lag accepted (one year of hourly samples)
pub const MAX_PERIODICITY_LAG: usize = 24 * 366;

/// Longest minimum burst duration accepted (one week)
pub const MAX_BURST_DURATION_MINUTES: i64 = 7 * 24 * 60;

/// Furthest trend projection accepted
pub const MAX_PROJECTION_DAYS: u32 = 3650;

/// Configuration errors found by [`AdvisorConfig::validate`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidValue { name: &'static str, value: f64 },

    #[error("periodicity lags must be greater than zero")]
    ZeroLag,

    #[error("{name} must be between 0 and {max} (got {value})")]
    OutOfRange {
        name: &'static str,
        value: i128,
        max: i128,
    },

    #[error("idle thresholds differ between detector ({detector}) and classifier ({classifier})")]
    IdleThresholdMismatch { detector: f64, classifier: f64 },
}

/// Thresholds for the pattern detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub idle_threshold_cpu: f64,
    /// Idle percentage above which the workload is idle-dominant
    pub idle_dominant_percent: f64,

    pub min_burst_samples: usize,
    pub burst_baseline_percentile: f64,
    /// Burst threshold = max(baseline * multiplier, floor)
    pub burst_multiplier: f64,
    pub burst_floor: f64,
    /// Bursts shorter than this are discarded as noise
    pub min_burst_duration_minutes: i64,
    pub min_burst_count: usize,
    pub min_burst_intensity: f64,
    pub min_quiet_hours: f64,

    pub diurnal_min_samples: usize,
    /// Peak/trough hourly ratio needed for a diurnal pattern
    pub diurnal_significance: f64,
    pub weekly_min_samples: usize,
    /// Relative weekday/weekend difference needed for a weekly pattern
    pub weekly_significance: f64,

    pub memory_pressure_percent: f64,
    pub memory_stable_stddev: f64,
    /// Daily growth (%/day) above which memory is flagged as leaking
    pub memory_leak_threshold: f64,
    /// Daily growth (%/day) above which a leak rate is reported at all
    pub leak_report_slope: f64,
    /// Pressure events above which a recommendation is issued
    pub memory_pressure_advice_events: usize,

    pub trend_min_samples: usize,
    pub trend_min_days: usize,
    /// |slope| (%/day) below which the trend is stable
    pub trend_slope_threshold: f64,
    pub trend_min_r_squared: f64,
    pub projection_days: u32,

    /// Best primary-pattern score below which the workload is erratic
    pub erratic_threshold: f64,
    pub erratic_confidence: f64,
    /// Average idle stretch (hours) that warrants scheduled stop/start advice
    pub scheduled_stop_idle_hours: f64,
    /// Bursts at most this long fit an event-driven function
    pub function_burst_max_minutes: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            idle_threshold_cpu: DEFAULT_IDLE_THRESHOLD_CPU,
            idle_dominant_percent: 70.0,
            min_burst_samples: 10,
            burst_baseline_percentile: 25.0,
            burst_multiplier: 2.0,
            burst_floor: 20.0,
            min_burst_duration_minutes: 5,
            min_burst_count: 3,
            min_burst_intensity: 2.0,
            min_quiet_hours: 1.0,
            diurnal_min_samples: 48,
            diurnal_significance: 1.5,
            weekly_min_samples: 168,
            weekly_significance: 0.3,
            memory_pressure_percent: 90.0,
            memory_stable_stddev: 10.0,
            memory_leak_threshold: 1.0,
            leak_report_slope: 0.5,
            memory_pressure_advice_events: 10,
            trend_min_samples: 48,
            trend_min_days: 3,
            trend_slope_threshold: 0.5,
            trend_min_r_squared: 0.5,
            projection_days: 30,
            erratic_threshold: 0.4,
            erratic_confidence: 0.5,
            scheduled_stop_idle_hours: 4.0,
            function_burst_max_minutes: 15.0,
        }
    }
}

/// Thresholds and weights for the workload classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub idle_threshold_cpu: f64,
    /// Fewer CPU samples than this (14 days hourly) triggers a data warning
    pub min_samples_for_confidence: usize,
    /// Runner-up candidates must score above this to be listed
    pub alternative_min_score: f64,
    pub periodicity: PeriodicityConfig,
    pub function: FunctionWeights,
    pub container: ContainerWeights,
    pub spot: SpotWeights,
    pub keep: KeepWeights,
    pub warnings: WarningThresholds,
    pub estimates: EstimateConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            idle_threshold_cpu: DEFAULT_IDLE_THRESHOLD_CPU,
            min_samples_for_confidence: 336,
            alternative_min_score: 0.3,
            periodicity: PeriodicityConfig::default(),
            function: FunctionWeights::default(),
            container: ContainerWeights::default(),
            spot: SpotWeights::default(),
            keep: KeepWeights::default(),
            warnings: WarningThresholds::default(),
            estimates: EstimateConfig::default(),
        }
    }
}

/// Lagged-correlation periodicity check (lags in samples, hourly data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicityConfig {
    pub min_samples: usize,
    pub lags: Vec<usize>,
    pub correlation_threshold: f64,
}

impl Default for PeriodicityConfig {
    fn default() -> Self {
        Self {
            min_samples: 48,
            lags: vec![24, 168],
            correlation_threshold: 0.7,
        }
    }
}

/// Event-driven function candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionWeights {
    pub max_avg_cpu: f64,
    pub low_cpu_weight: f64,
    pub min_idle_percent: f64,
    pub idle_weight: f64,
    pub min_burst_ratio: f64,
    pub burst_weight: f64,
    pub max_disk_write_ops: f64,
    pub stateless_weight: f64,
    pub persistent_storage_penalty: f64,
    pub auto_scaled_penalty: f64,
    pub max_memory_percent: f64,
    pub high_memory_penalty: f64,
}

impl Default for FunctionWeights {
    fn default() -> Self {
        Self {
            max_avg_cpu: 20.0,
            low_cpu_weight: 0.25,
            min_idle_percent: 70.0,
            idle_weight: 0.25,
            min_burst_ratio: 3.0,
            burst_weight: 0.2,
            max_disk_write_ops: 100.0,
            stateless_weight: 0.15,
            persistent_storage_penalty: 0.2,
            auto_scaled_penalty: 0.1,
            max_memory_percent: 80.0,
            high_memory_penalty: 0.15,
        }
    }
}

/// Managed container candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerWeights {
    pub min_avg_cpu: f64,
    pub max_avg_cpu: f64,
    pub cpu_band_weight: f64,
    pub max_cpu_stddev: f64,
    pub low_variance_weight: f64,
    pub min_uptime_percent: f64,
    pub uptime_weight: f64,
    pub max_memory_stddev: f64,
    pub stable_memory_weight: f64,
    pub min_network_activity: f64,
    pub network_weight: f64,
    pub auto_scaled_weight: f64,
    pub max_disk_write_ops: f64,
    pub disk_io_penalty: f64,
}

impl Default for ContainerWeights {
    fn default() -> Self {
        Self {
            min_avg_cpu: 5.0,
            max_avg_cpu: 80.0,
            cpu_band_weight: 0.2,
            max_cpu_stddev: 25.0,
            low_variance_weight: 0.2,
            min_uptime_percent: 80.0,
            uptime_weight: 0.2,
            max_memory_stddev: 15.0,
            stable_memory_weight: 0.15,
            min_network_activity: 1000.0,
            network_weight: 0.1,
            auto_scaled_weight: 0.1,
            max_disk_write_ops: 1000.0,
            disk_io_penalty: 0.15,
        }
    }
}

/// Spot capacity candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotWeights {
    pub min_variability: f64,
    pub variability_weight: f64,
    pub periodic_weight: f64,
    /// Paired with an average CPU above the function candidate's ceiling
    pub min_burst_ratio: f64,
    pub sustained_burst_weight: f64,
    pub min_p95_cpu: f64,
    pub compute_weight: f64,
    pub max_network_out: f64,
    pub low_egress_weight: f64,
    pub min_age_days: u32,
    pub age_weight: f64,
    pub stable_address_penalty: f64,
}

impl Default for SpotWeights {
    fn default() -> Self {
        Self {
            min_variability: 1.0,
            variability_weight: 0.2,
            periodic_weight: 0.2,
            min_burst_ratio: 2.0,
            sustained_burst_weight: 0.15,
            min_p95_cpu: 70.0,
            compute_weight: 0.15,
            max_network_out: 10_000.0,
            low_egress_weight: 0.1,
            min_age_days: 30,
            age_weight: 0.1,
            stable_address_penalty: 0.2,
        }
    }
}

/// Status quo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepWeights {
    pub base_score: f64,
    pub min_avg_cpu: f64,
    pub max_cpu_stddev: f64,
    pub high_stable_cpu_weight: f64,
    pub min_memory: f64,
    pub high_memory_weight: f64,
    pub min_disk_ops: f64,
    pub disk_io_weight: f64,
    pub stable_address_weight: f64,
    pub persistent_storage_weight: f64,
}

impl Default for KeepWeights {
    fn default() -> Self {
        Self {
            base_score: 0.3,
            min_avg_cpu: 70.0,
            max_cpu_stddev: 15.0,
            high_stable_cpu_weight: 0.25,
            min_memory: 70.0,
            high_memory_weight: 0.15,
            min_disk_ops: 500.0,
            disk_io_weight: 0.15,
            stable_address_weight: 0.1,
            persistent_storage_weight: 0.1,
        }
    }
}

/// Conditions for post-selection warnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningThresholds {
    pub container_max_cpu_stddev: f64,
    pub function_max_memory: f64,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            container_max_cpu_stddev: 20.0,
            function_max_memory: 60.0,
        }
    }
}

/// Savings and sizing heuristics per classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    /// Savings percent per idle percent for a function target
    pub function_savings_per_idle_percent: f64,
    pub function_max_savings: f64,
    /// First matching tier wins; the tier without a bound catches the rest
    pub function_sizes: Vec<FunctionSize>,
    pub container_sizes: Vec<ContainerSize>,
    pub spot_savings: f64,
    pub downsize_below_cpu: f64,
    pub downsize_savings: f64,
    pub upsize_above_cpu: f64,
    /// Stand-in for an absent CPU or memory average when sizing
    pub assumed_utilization: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            function_savings_per_idle_percent: 0.8,
            function_max_savings: 80.0,
            function_sizes: vec![
                FunctionSize {
                    below_memory: Some(30.0),
                    memory_mb: 512,
                },
                FunctionSize {
                    below_memory: Some(60.0),
                    memory_mb: 1024,
                },
                FunctionSize {
                    below_memory: None,
                    memory_mb: 2048,
                },
            ],
            container_sizes: vec![
                ContainerSize {
                    below_cpu: Some(25.0),
                    savings_percent: 40.0,
                    vcpu: 0.25,
                    memory_gb: 0.5,
                },
                ContainerSize {
                    below_cpu: Some(50.0),
                    savings_percent: 25.0,
                    vcpu: 0.5,
                    memory_gb: 1.0,
                },
                ContainerSize {
                    below_cpu: None,
                    savings_percent: 15.0,
                    vcpu: 1.0,
                    memory_gb: 2.0,
                },
            ],
            spot_savings: 70.0,
            downsize_below_cpu: 20.0,
            downsize_savings: 30.0,
            upsize_above_cpu: 80.0,
            assumed_utilization: 50.0,
        }
    }
}

/// Function memory tier keyed on average memory utilization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSize {
    pub below_memory: Option<f64>,
    pub memory_mb: u32,
}

/// Container tier keyed on average CPU utilization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub below_cpu: Option<f64>,
    pub savings_percent: f64,
    pub vcpu: f64,
    pub memory_gb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AdvisorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AdvisorConfig::default();
        assert_eq!(config.detector.idle_threshold_cpu, 5.0);
        assert_eq!(config.detector.burst_multiplier, 2.0);
        assert_eq!(config.detector.min_burst_duration_minutes, 5);
        assert_eq!(config.detector.diurnal_significance, 1.5);
        assert_eq!(config.detector.weekly_significance, 0.3);
        assert_eq!(config.detector.memory_leak_threshold, 1.0);
        assert_eq!(config.classifier.periodicity.lags, vec![24, 168]);
        assert_eq!(config.classifier.keep.base_score, 0.3);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{"detector": {"idle_threshold_cpu": 3.0}, "classifier": {"function": {"max_avg_cpu": 15.0}}}"#;
        let config: AdvisorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.detector.idle_threshold_cpu, 3.0);
        assert_eq!(config.detector.burst_floor, 20.0);
        assert_eq!(config.classifier.function.max_avg_cpu, 15.0);
        assert_eq!(config.classifier.function.idle_weight, 0.25);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = AdvisorConfig::default();
        config.detector.burst_multiplier = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                name: "detector.burst_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_lag_rejected() {
        let mut config = AdvisorConfig::default();
        config.classifier.periodicity.lags = vec![24, 0];
        assert_eq!(config.validate(), Err(ConfigError::ZeroLag));
    }

    #[test]
    fn test_oversized_lag_rejected() {
        let mut config = AdvisorConfig::default();
        config.classifier.periodicity.lags = vec![24, usize::MAX];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "classifier.periodicity.lags",
                ..
            })
        ));
    }

    #[test]
    fn test_burst_duration_out_of_range_rejected() {
        for minutes in [-1, i64::MAX] {
            let mut config = AdvisorConfig::default();
            config.detector.min_burst_duration_minutes = minutes;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::OutOfRange {
                    name: "detector.min_burst_duration_minutes",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_projection_days_out_of_range_rejected() {
        let mut config = AdvisorConfig::default();
        config.detector.projection_days = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "detector.projection_days",
                value,
                ..
            }) if value == u32::MAX as i128
        ));

        config.detector.projection_days = MAX_PROJECTION_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_idle_threshold_mismatch_rejected() {
        let mut config = AdvisorConfig::default();
        config.detector.idle_threshold_cpu = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IdleThresholdMismatch { .. })
        ));
    }
}
