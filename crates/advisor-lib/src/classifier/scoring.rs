//! Candidate scoring
//!
//! Each candidate is scored by an independent pure function returning the
//! score and the reasons that contributed to it. Absent statistics fall back
//! to a per-rule value chosen so the rule does not fire on missing data.

use super::{CandidateScore, Classification};
use super::periodicity::detect_periodicity;
use crate::config::ClassifierConfig;
use crate::models::{series_values, WorkloadSnapshot};
use crate::stats::StatisticsSummary;

/// Scoring seam between statistics and selection.
///
/// Implementations must be pure: the same inputs always give the same score.
pub trait CandidateScorer: Send + Sync {
    /// Score one classification candidate
    fn score(
        &self,
        candidate: Classification,
        snapshot: &WorkloadSnapshot,
        summary: &StatisticsSummary,
    ) -> CandidateScore;

    /// Identifier reported in logs
    fn name(&self) -> &str;
}

/// Fixed-weight heuristic scorer
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    config: ClassifierConfig,
}

impl HeuristicScorer {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

impl CandidateScorer for HeuristicScorer {
    fn score(
        &self,
        candidate: Classification,
        snapshot: &WorkloadSnapshot,
        summary: &StatisticsSummary,
    ) -> CandidateScore {
        match candidate {
            Classification::FunctionCandidate => {
                score_function_candidate(snapshot, summary, &self.config)
            }
            Classification::ContainerCandidate => {
                score_container_candidate(snapshot, summary, &self.config)
            }
            Classification::SpotCandidate => score_spot_candidate(snapshot, summary, &self.config),
            Classification::KeepAsIs => score_keep_as_is(snapshot, summary, &self.config),
        }
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Accumulates weighted contributions and their reasons
struct Tally {
    classification: Classification,
    score: f64,
    reasons: Vec<String>,
}

impl Tally {
    fn new(classification: Classification, base: f64) -> Self {
        Self {
            classification,
            score: base,
            reasons: Vec::new(),
        }
    }

    fn add(&mut self, weight: f64, reason: String) {
        self.score += weight;
        self.reasons.push(reason);
    }

    fn finish(self, cap: f64) -> CandidateScore {
        CandidateScore {
            classification: self.classification,
            score: self.score.clamp(0.0, cap),
            reasons: self.reasons,
        }
    }
}

/// Event-driven function: low, spiky, mostly idle, stateless
pub fn score_function_candidate(
    snapshot: &WorkloadSnapshot,
    summary: &StatisticsSummary,
    config: &ClassifierConfig,
) -> CandidateScore {
    let w = &config.function;
    let mut tally = Tally::new(Classification::FunctionCandidate, 0.0);

    let cpu_avg = summary.cpu_avg.unwrap_or(100.0);
    if cpu_avg <= w.max_avg_cpu {
        tally.add(
            w.low_cpu_weight,
            format!("Low average CPU ({cpu_avg:.1}%) indicates an event-driven workload"),
        );
    }

    let idle = summary.cpu_idle_percent.unwrap_or(0.0);
    if idle >= w.min_idle_percent {
        tally.add(
            w.idle_weight,
            format!("High idle time ({idle:.1}%) suggests sporadic usage"),
        );
    }

    if summary.burst_ratio >= w.min_burst_ratio {
        tally.add(
            w.burst_weight,
            format!("Burst ratio {:.1}x indicates spiky demand", summary.burst_ratio),
        );
    }

    if summary.disk_write_ops_avg.unwrap_or(0.0) < w.max_disk_write_ops {
        tally.add(
            w.stateless_weight,
            "Low disk write activity suggests stateless processing".to_string(),
        );
    }

    if snapshot.has_persistent_storage {
        tally.add(
            -w.persistent_storage_penalty,
            "Persistent storage attached: state would need to move elsewhere".to_string(),
        );
    }

    if snapshot.is_auto_scaled {
        tally.add(
            -w.auto_scaled_penalty,
            "Auto-scaled group membership points to a steady service".to_string(),
        );
    }

    let memory_avg = summary.memory_avg.unwrap_or(0.0);
    if memory_avg > w.max_memory_percent {
        tally.add(
            -w.high_memory_penalty,
            format!("High memory usage ({memory_avg:.1}%) may exceed function memory limits"),
        );
    }

    tally.finish(f64::INFINITY)
}

/// Managed container: moderate, predictable, always on
pub fn score_container_candidate(
    snapshot: &WorkloadSnapshot,
    summary: &StatisticsSummary,
    config: &ClassifierConfig,
) -> CandidateScore {
    let w = &config.container;
    let mut tally = Tally::new(Classification::ContainerCandidate, 0.0);

    let cpu_avg = summary.cpu_avg.unwrap_or(0.0);
    if (w.min_avg_cpu..=w.max_avg_cpu).contains(&cpu_avg) {
        tally.add(
            w.cpu_band_weight,
            format!("Consistent CPU usage ({cpu_avg:.1}%) fits a container allocation"),
        );
    }

    let cpu_stddev = summary.cpu_stddev.unwrap_or(100.0);
    if cpu_stddev <= w.max_cpu_stddev {
        tally.add(
            w.low_variance_weight,
            format!("Low CPU variance (stddev {cpu_stddev:.1}) indicates predictable load"),
        );
    }

    let uptime = 100.0 - summary.cpu_idle_percent.unwrap_or(100.0);
    if uptime >= w.min_uptime_percent {
        tally.add(
            w.uptime_weight,
            format!("High uptime ({uptime:.1}%) suits an always-on container"),
        );
    }

    if summary.memory_stddev.unwrap_or(100.0) < w.max_memory_stddev {
        tally.add(
            w.stable_memory_weight,
            "Stable memory usage fits a fixed container allocation".to_string(),
        );
    }

    let network_in = summary.network_in_avg.unwrap_or(0.0);
    let network_out = summary.network_out_avg.unwrap_or(0.0);
    if network_in > w.min_network_activity || network_out > w.min_network_activity {
        tally.add(
            w.network_weight,
            "Network activity indicates a service-type workload".to_string(),
        );
    }

    if snapshot.is_auto_scaled {
        tally.add(
            w.auto_scaled_weight,
            "Auto-scaled group membership suggests a container-friendly architecture".to_string(),
        );
    }

    if summary.disk_write_ops_max.unwrap_or(0.0) > w.max_disk_write_ops {
        tally.add(
            -w.disk_io_penalty,
            "High peak disk I/O would need a persistent volume strategy".to_string(),
        );
    }

    tally.finish(f64::INFINITY)
}

/// Spot capacity: variable, periodic, compute-heavy, interruptible
pub fn score_spot_candidate(
    snapshot: &WorkloadSnapshot,
    summary: &StatisticsSummary,
    config: &ClassifierConfig,
) -> CandidateScore {
    let w = &config.spot;
    let mut tally = Tally::new(Classification::SpotCandidate, 0.0);

    if summary.variability_score > w.min_variability {
        tally.add(
            w.variability_weight,
            format!(
                "High variability ({:.2}) suggests batch processing",
                summary.variability_score
            ),
        );
    }

    let cpu = series_values(&snapshot.cpu_utilization);
    if detect_periodicity(&cpu, &config.periodicity) {
        tally.add(
            w.periodic_weight,
            "Periodic usage detected: work can be scheduled on spot capacity".to_string(),
        );
    }

    let cpu_avg = summary.cpu_avg.unwrap_or(0.0);
    if summary.burst_ratio > w.min_burst_ratio && cpu_avg > config.function.max_avg_cpu {
        tally.add(
            w.sustained_burst_weight,
            "Bursty but sustained load is too heavy for functions".to_string(),
        );
    }

    let p95 = summary.cpu_p95.unwrap_or(0.0);
    if p95 > w.min_p95_cpu {
        tally.add(
            w.compute_weight,
            format!("Compute-intensive (P95 CPU {p95:.1}%) benefits from spot pricing"),
        );
    }

    if summary.network_out_avg.unwrap_or(0.0) < w.max_network_out {
        tally.add(
            w.low_egress_weight,
            "Low network egress suggests a non-interactive workload".to_string(),
        );
    }

    if snapshot.age_days > w.min_age_days {
        tally.add(
            w.age_weight,
            format!("Long-running instance ({} days)", snapshot.age_days),
        );
    }

    if snapshot.has_stable_address {
        tally.add(
            -w.stable_address_penalty,
            "Stable network address implies a fixed endpoint: interruptions are risky".to_string(),
        );
    }

    tally.finish(f64::INFINITY)
}

/// Status quo: always viable, favoured by heavy and stateful workloads
pub fn score_keep_as_is(
    snapshot: &WorkloadSnapshot,
    summary: &StatisticsSummary,
    config: &ClassifierConfig,
) -> CandidateScore {
    let w = &config.keep;
    let mut tally = Tally::new(Classification::KeepAsIs, w.base_score);

    let cpu_avg = summary.cpu_avg.unwrap_or(0.0);
    let cpu_stddev = summary.cpu_stddev.unwrap_or(0.0);
    if cpu_avg > w.min_avg_cpu && cpu_stddev < w.max_cpu_stddev {
        tally.add(
            w.high_stable_cpu_weight,
            format!("High, stable CPU usage ({cpu_avg:.1}%) uses the instance well"),
        );
    }

    let memory_avg = summary.memory_avg.unwrap_or(0.0);
    if memory_avg > w.min_memory {
        tally.add(
            w.high_memory_weight,
            format!("High memory usage ({memory_avg:.1}%) may need a dedicated instance"),
        );
    }

    let disk_read = summary.disk_read_ops_avg.unwrap_or(0.0);
    let disk_write = summary.disk_write_ops_avg.unwrap_or(0.0);
    if disk_read > w.min_disk_ops || disk_write > w.min_disk_ops {
        tally.add(
            w.disk_io_weight,
            "Significant disk I/O favours attached block storage".to_string(),
        );
    }

    if snapshot.has_stable_address {
        tally.add(
            w.stable_address_weight,
            "Stable network address indicates a fixed endpoint".to_string(),
        );
    }

    if snapshot.has_persistent_storage {
        tally.add(
            w.persistent_storage_weight,
            "Persistent storage attached: data locality matters".to_string(),
        );
    }

    tally.finish(1.0)
}
