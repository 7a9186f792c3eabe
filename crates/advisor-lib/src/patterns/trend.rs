//! Long-term trend and leak detection
//!
//! Samples are aggregated to one mean per calendar day (UTC) and a
//! least-squares line is fitted over day index vs. daily mean. Slopes are
//! therefore in percentage points per day.

use crate::config::DetectorConfig;
use crate::models::MetricPoint;
use crate::stats::linear_fit;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction of a usage trend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Growing,
    Declining,
    #[default]
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Growing => write!(f, "growing"),
            TrendDirection::Declining => write!(f, "declining"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Usage trend analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendPattern {
    pub direction: TrendDirection,
    pub slope_per_day: f64,
    /// Goodness of fit, 0-1
    pub r_squared: f64,
    /// Linear projection `projection_days` past the last day, clamped to 0-100
    pub predicted_30_day_value: f64,
}

/// Mean value per calendar day, in ascending date order
pub fn daily_means(series: &[MetricPoint]) -> Vec<f64> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for point in series {
        let entry = days.entry(point.timestamp.date_naive()).or_insert((0.0, 0));
        entry.0 += point.value;
        entry.1 += 1;
    }
    days.values().map(|(sum, count)| sum / *count as f64).collect()
}

/// Analyze the overall trend of a series
pub fn analyze_trend(series: &[MetricPoint], config: &DetectorConfig) -> TrendPattern {
    if series.len() < config.trend_min_samples {
        return TrendPattern::default();
    }

    let means = daily_means(series);
    if means.len() < config.trend_min_days {
        return TrendPattern {
            predicted_30_day_value: means.last().copied().unwrap_or(0.0),
            ..TrendPattern::default()
        };
    }

    let Some(fit) = linear_fit(&means) else {
        return TrendPattern::default();
    };

    let horizon = means.len() as f64 + f64::from(config.projection_days);
    let predicted = fit.predict(horizon).clamp(0.0, 100.0);

    let direction = if fit.slope.abs() < config.trend_slope_threshold {
        TrendDirection::Stable
    } else if fit.slope > 0.0 {
        TrendDirection::Growing
    } else {
        TrendDirection::Declining
    };

    TrendPattern {
        direction,
        slope_per_day: fit.slope,
        r_squared: fit.r_squared.max(0.0),
        predicted_30_day_value: predicted,
    }
}

/// Daily growth rate of a memory series when it is rising noticeably.
///
/// Returns `None` without enough data or when the slope does not exceed
/// `leak_report_slope`.
pub fn leak_rate(series: &[MetricPoint], config: &DetectorConfig) -> Option<f64> {
    if series.len() < config.trend_min_samples {
        return None;
    }

    let means = daily_means(series);
    if means.len() < config.trend_min_days {
        return None;
    }

    let fit = linear_fit(&means)?;
    (fit.slope > config.leak_report_slope).then_some(fit.slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::{hourly, hourly_fn};

    #[test]
    fn test_short_series_is_stable() {
        let trend = analyze_trend(&hourly(&[10.0; 47]), &DetectorConfig::default());
        assert_eq!(trend, TrendPattern::default());
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_two_days_projects_last_mean() {
        let series = hourly_fn(48, |i| if i < 24 { 10.0 } else { 20.0 });
        let trend = analyze_trend(&series, &DetectorConfig::default());

        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.slope_per_day, 0.0);
        assert_eq!(trend.predicted_30_day_value, 20.0);
    }

    #[test]
    fn test_daily_means_group_by_date() {
        let series = hourly_fn(72, |i| (i / 24) as f64 * 10.0);
        assert_eq!(daily_means(&series), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_growing_trend() {
        // +2 points per day for 10 days
        let series = hourly_fn(240, |i| 20.0 + (i / 24) as f64 * 2.0);
        let trend = analyze_trend(&series, &DetectorConfig::default());

        assert_eq!(trend.direction, TrendDirection::Growing);
        assert!((trend.slope_per_day - 2.0).abs() < 1e-9);
        assert!((trend.r_squared - 1.0).abs() < 1e-9);
        // 20 + 2 * (10 + 30)
        assert!((trend.predicted_30_day_value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_declining_projection_clamped() {
        let series = hourly_fn(240, |i| 50.0 - (i / 24) as f64 * 3.0);
        let trend = analyze_trend(&series, &DetectorConfig::default());

        assert_eq!(trend.direction, TrendDirection::Declining);
        assert_eq!(trend.predicted_30_day_value, 0.0);
    }

    #[test]
    fn test_small_slope_is_stable() {
        let series = hourly_fn(240, |i| 40.0 + (i / 24) as f64 * 0.2);
        let trend = analyze_trend(&series, &DetectorConfig::default());
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_leak_rate() {
        let config = DetectorConfig::default();
        let leaking = hourly_fn(240, |i| 30.0 + (i / 24) as f64 * 1.5);
        let flat = hourly(&[30.0; 240]);

        assert!((leak_rate(&leaking, &config).unwrap() - 1.5).abs() < 1e-9);
        assert!(leak_rate(&flat, &config).is_none());
        assert!(leak_rate(&leaking[..47], &config).is_none());
    }

    #[test]
    fn test_far_projection_stays_clamped() {
        let config = DetectorConfig {
            projection_days: u32::MAX,
            ..DetectorConfig::default()
        };
        let series = hourly_fn(240, |i| 20.0 + (i / 24) as f64 * 2.0);
        let trend = analyze_trend(&series, &config);

        assert_eq!(trend.direction, TrendDirection::Growing);
        assert_eq!(trend.predicted_30_day_value, 100.0);
    }
}
