//! Hour-of-day and day-of-week cycles

use crate::config::DetectorConfig;
use crate::models::MetricPoint;
use crate::stats::{mean, RATIO_DENOMINATOR_FLOOR};
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// Day/night cycle analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiurnalPattern {
    pub has_diurnal_pattern: bool,
    /// Hour of day (0-23, UTC)
    pub peak_hour: u32,
    pub trough_hour: u32,
    pub peak_to_trough_ratio: f64,
    /// Average per hour of day; empty when not analyzed
    pub hourly_averages: Vec<f64>,
}

impl Default for DiurnalPattern {
    fn default() -> Self {
        Self {
            has_diurnal_pattern: false,
            peak_hour: 0,
            trough_hour: 0,
            peak_to_trough_ratio: 1.0,
            hourly_averages: Vec::new(),
        }
    }
}

/// Weekday/weekend cycle analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPattern {
    pub has_weekly_pattern: bool,
    /// Day of week, Monday = 0
    pub peak_day: u32,
    pub trough_day: u32,
    pub weekday_avg: f64,
    pub weekend_avg: f64,
    /// Average per day of week; empty when not analyzed
    pub daily_averages: Vec<f64>,
}

/// Average values per bucket; empty buckets average to 0
fn bucket_averages<const N: usize, F>(series: &[MetricPoint], bucket: F) -> Vec<f64>
where
    F: Fn(&MetricPoint) -> usize,
{
    let mut buckets: [Vec<f64>; N] = std::array::from_fn(|_| Vec::new());
    for point in series {
        buckets[bucket(point)].push(point.value);
    }
    buckets.iter().map(|values| mean(values)).collect()
}

/// Index of the first maximum and the first minimum
fn peak_and_trough(averages: &[f64]) -> (usize, usize) {
    let mut peak = 0;
    let mut trough = 0;
    for (i, value) in averages.iter().enumerate() {
        if *value > averages[peak] {
            peak = i;
        }
        if *value < averages[trough] {
            trough = i;
        }
    }
    (peak, trough)
}

/// Analyze hour-of-day variation
pub fn analyze_diurnal(series: &[MetricPoint], config: &DetectorConfig) -> DiurnalPattern {
    if series.len() < config.diurnal_min_samples {
        return DiurnalPattern::default();
    }

    let hourly_averages = bucket_averages::<24, _>(series, |p| p.timestamp.hour() as usize);
    let (peak, trough) = peak_and_trough(&hourly_averages);
    let ratio = hourly_averages[peak] / hourly_averages[trough].max(RATIO_DENOMINATOR_FLOOR);

    DiurnalPattern {
        has_diurnal_pattern: ratio >= config.diurnal_significance,
        peak_hour: peak as u32,
        trough_hour: trough as u32,
        peak_to_trough_ratio: ratio,
        hourly_averages,
    }
}

/// Analyze weekday vs weekend variation
pub fn analyze_weekly(series: &[MetricPoint], config: &DetectorConfig) -> WeeklyPattern {
    if series.len() < config.weekly_min_samples {
        return WeeklyPattern::default();
    }

    let daily_averages = bucket_averages::<7, _>(series, |p| {
        p.timestamp.weekday().num_days_from_monday() as usize
    });
    let (peak, trough) = peak_and_trough(&daily_averages);

    let weekday_avg = mean(&daily_averages[..5]);
    let weekend_avg = mean(&daily_averages[5..]);
    let difference = (weekday_avg - weekend_avg).abs() / weekday_avg.max(weekend_avg).max(1.0);

    WeeklyPattern {
        has_weekly_pattern: difference > config.weekly_significance,
        peak_day: peak as u32,
        trough_day: trough as u32,
        weekday_avg,
        weekend_avg,
        daily_averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::{hourly, hourly_fn};

    fn business_hours(hours: usize) -> Vec<MetricPoint> {
        hourly_fn(hours, |i| if (9..=17).contains(&(i % 24)) { 80.0 } else { 10.0 })
    }

    #[test]
    fn test_insufficient_samples_is_neutral() {
        let config = DetectorConfig::default();
        let series = hourly(&[50.0; 47]);

        assert_eq!(analyze_diurnal(&series, &config), DiurnalPattern::default());
        assert_eq!(analyze_weekly(&series, &config), WeeklyPattern::default());
    }

    #[test]
    fn test_business_hours_are_diurnal() {
        let diurnal = analyze_diurnal(&business_hours(168), &DetectorConfig::default());

        assert!(diurnal.has_diurnal_pattern);
        assert!(diurnal.peak_to_trough_ratio > 3.0);
        assert!((9..=17).contains(&diurnal.peak_hour));
        assert!(!(9..=17).contains(&diurnal.trough_hour));
        assert_eq!(diurnal.hourly_averages.len(), 24);
    }

    #[test]
    fn test_flat_series_not_diurnal() {
        let diurnal = analyze_diurnal(&hourly(&[40.0; 96]), &DetectorConfig::default());

        assert!(!diurnal.has_diurnal_pattern);
        assert_eq!(diurnal.peak_to_trough_ratio, 1.0);
        assert_eq!(diurnal.peak_hour, 0);
    }

    #[test]
    fn test_trough_denominator_floored() {
        // Zero at night gives a finite ratio
        let series = hourly_fn(48, |i| if i % 24 < 12 { 0.0 } else { 1.0 });
        let diurnal = analyze_diurnal(&series, &DetectorConfig::default());

        assert!((diurnal.peak_to_trough_ratio - 1.0 / RATIO_DENOMINATOR_FLOOR).abs() < 1e-9);
        assert!(diurnal.has_diurnal_pattern);
    }

    #[test]
    fn test_weekend_drop_is_weekly() {
        // 2024-01-01 is a Monday
        let series = hourly_fn(336, |i| if (i / 24) % 7 >= 5 { 5.0 } else { 60.0 });
        let weekly = analyze_weekly(&series, &DetectorConfig::default());

        assert!(weekly.has_weekly_pattern);
        assert_eq!(weekly.weekday_avg, 60.0);
        assert_eq!(weekly.weekend_avg, 5.0);
        assert_eq!(weekly.peak_day, 0);
        assert_eq!(weekly.trough_day, 5);
    }

    #[test]
    fn test_uniform_week_not_weekly() {
        let weekly = analyze_weekly(&hourly(&[30.0; 200]), &DetectorConfig::default());
        assert!(!weekly.has_weekly_pattern);
        assert_eq!(weekly.daily_averages.len(), 7);
    }
}
