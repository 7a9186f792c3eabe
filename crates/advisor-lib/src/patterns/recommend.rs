//! Advisory text derived from a pattern analysis

use super::{PatternAnalysis, PatternType};
use crate::config::DetectorConfig;

/// Build optimization advice for an analysis.
///
/// The `recommendations` field of `analysis` is ignored.
pub fn recommendations(analysis: &PatternAnalysis, config: &DetectorConfig) -> Vec<String> {
    let mut advice = Vec::new();
    let PatternAnalysis {
        idle,
        burst,
        diurnal,
        weekly,
        memory,
        trend,
        ..
    } = analysis;

    match analysis.primary_pattern {
        PatternType::IdleDominant => {
            advice.push(format!(
                "Idle {:.0}% of the time: pay-per-use functions or containers could cut costs significantly",
                idle.idle_percent
            ));
            if idle.avg_idle_duration_hours > config.scheduled_stop_idle_hours {
                advice.push("Schedule stop/start around the predictable idle periods".to_string());
            }
        }
        PatternType::Bursty => {
            if burst.avg_burst_duration_minutes < config.function_burst_max_minutes {
                advice.push(format!(
                    "Bursts average {:.0} minutes: short enough for function execution limits",
                    burst.avg_burst_duration_minutes
                ));
            } else {
                advice.push("Bursts are long-running: run as auto-scaled containers".to_string());
            }
        }
        PatternType::Batch => {
            advice.push(
                "Batch processing pattern: interruptible spot capacity fits this workload"
                    .to_string(),
            );
            if diurnal.has_diurnal_pattern {
                advice.push(format!(
                    "Run batch jobs off-peak (usage lowest around {:02}:00 UTC)",
                    diurnal.trough_hour
                ));
            }
        }
        PatternType::Diurnal => {
            advice.push(format!(
                "Scale down off-peak (trough around {:02}:00 UTC) with scheduled scaling",
                diurnal.trough_hour
            ));
        }
        PatternType::Weekly => {
            if weekly.weekend_avg < weekly.weekday_avg * 0.5 {
                advice.push(
                    "Weekend usage is under half of weekday usage: shut down or scale down on weekends"
                        .to_string(),
                );
            }
        }
        PatternType::Growing => {
            advice.push(format!(
                "Usage growing {:.1}%/day: plan capacity increase or commit to reserved pricing",
                trend.slope_per_day
            ));
        }
        PatternType::Declining => {
            advice.push(format!(
                "Usage declining {:.1}%/day: right-size or decommission",
                trend.slope_per_day.abs()
            ));
        }
        PatternType::SteadyState => {
            advice.push(
                "Steady usage: commitment pricing (reserved capacity, savings plans) fits well"
                    .to_string(),
            );
        }
        PatternType::Erratic => {}
    }

    if memory.has_memory_leak {
        let rate = memory.leak_rate_percent_per_day.unwrap_or_default();
        advice.push(format!(
            "Possible memory leak: memory grows {rate:.1}%/day, investigate application memory management"
        ));
    }

    if memory.memory_pressure_events > config.memory_pressure_advice_events {
        advice.push(format!(
            "Memory pressure: {} samples above {:.0}%, consider a larger memory allocation",
            memory.memory_pressure_events, config.memory_pressure_percent
        ));
    }

    advice
}
