//! Post-selection warnings and savings/target estimates

use super::Classification;
use crate::config::ClassifierConfig;
use crate::models::WorkloadSnapshot;
use crate::stats::StatisticsSummary;
use serde::{Deserialize, Serialize};

/// Savings estimate and target descriptor for a chosen classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub savings_percent: Option<f64>,
    pub target: Option<String>,
}

/// Caveats about the chosen classification
pub fn warnings(
    classification: Classification,
    snapshot: &WorkloadSnapshot,
    summary: &StatisticsSummary,
    config: &ClassifierConfig,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let thresholds = &config.warnings;

    let samples = snapshot.cpu_utilization.len();
    if samples < config.min_samples_for_confidence {
        warnings.push(format!(
            "Limited data ({samples} CPU samples): {} hourly samples (14 days) recommended",
            config.min_samples_for_confidence
        ));
    }

    match classification {
        Classification::ContainerCandidate => {
            if summary.cpu_stddev.unwrap_or(0.0) > thresholds.container_max_cpu_stddev {
                warnings.push("Moderate CPU variance: size the container carefully".to_string());
            }
        }
        Classification::FunctionCandidate => {
            if summary.memory_avg.unwrap_or(0.0) > thresholds.function_max_memory {
                warnings.push(
                    "Memory usage may approach function limits: measure actual requirements"
                        .to_string(),
                );
            }
        }
        Classification::SpotCandidate => {
            if snapshot.has_stable_address {
                warnings.push(
                    "Stable network address attached: plan for spot interruption handling"
                        .to_string(),
                );
            }
        }
        Classification::KeepAsIs => {}
    }

    warnings
}

/// Candidate-specific savings and target sizing
pub fn estimate_savings(
    classification: Classification,
    snapshot: &WorkloadSnapshot,
    summary: &StatisticsSummary,
    config: &ClassifierConfig,
) -> SavingsEstimate {
    let est = &config.estimates;

    match classification {
        Classification::FunctionCandidate => {
            let idle = summary.cpu_idle_percent.unwrap_or(0.0);
            let memory = summary.memory_avg.unwrap_or(est.assumed_utilization);
            let size = est
                .function_sizes
                .iter()
                .find(|tier| tier.below_memory.map_or(true, |bound| memory < bound));

            SavingsEstimate {
                savings_percent: Some(
                    (idle * est.function_savings_per_idle_percent).min(est.function_max_savings),
                ),
                target: size.map(|tier| format!("Function {}MB", tier.memory_mb)),
            }
        }
        Classification::ContainerCandidate => {
            let cpu = summary.cpu_avg.unwrap_or(est.assumed_utilization);
            match est
                .container_sizes
                .iter()
                .find(|tier| tier.below_cpu.map_or(true, |bound| cpu < bound))
            {
                Some(tier) => SavingsEstimate {
                    savings_percent: Some(tier.savings_percent),
                    target: Some(format!(
                        "Container {}vCPU / {}GB",
                        tier.vcpu, tier.memory_gb
                    )),
                },
                None => SavingsEstimate::default(),
            }
        }
        Classification::SpotCandidate => SavingsEstimate {
            savings_percent: Some(est.spot_savings),
            target: Some(format!("Spot {}", snapshot.instance_class)),
        },
        Classification::KeepAsIs => {
            let cpu = summary.cpu_avg.unwrap_or(est.assumed_utilization);
            if cpu < est.downsize_below_cpu {
                SavingsEstimate {
                    savings_percent: Some(est.downsize_savings),
                    target: Some(format!("Downsize {}", snapshot.instance_class)),
                }
            } else if cpu > est.upsize_above_cpu {
                SavingsEstimate {
                    savings_percent: None,
                    target: Some(format!("Consider upsizing {}", snapshot.instance_class)),
                }
            } else {
                SavingsEstimate::default()
            }
        }
    }
}
