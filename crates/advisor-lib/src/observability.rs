//! Observability for the workload advisor
//!
//! Provides:
//! - Prometheus metrics (assessment latency, outcomes by label, rejected input)
//! - Structured event logging with tracing

use crate::classifier::ClassificationResult;
use crate::models::SnapshotError;
use crate::patterns::PatternAnalysis;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for assessment latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AdvisorMetricsInner> = OnceLock::new();

struct AdvisorMetricsInner {
    assessment_latency_seconds: Histogram,
    classifications_total: IntCounterVec,
    pattern_analyses_total: IntCounterVec,
    rejected_snapshots_total: IntCounter,
}

impl AdvisorMetricsInner {
    fn new() -> Self {
        Self {
            assessment_latency_seconds: register_histogram!(
                "workload_advisor_assessment_latency_seconds",
                "Time spent classifying and analyzing one workload",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register assessment_latency_seconds"),

            classifications_total: register_int_counter_vec!(
                "workload_advisor_classifications_total",
                "Workloads classified, by chosen classification",
                &["classification"]
            )
            .expect("Failed to register classifications_total"),

            pattern_analyses_total: register_int_counter_vec!(
                "workload_advisor_pattern_analyses_total",
                "Pattern analyses, by primary pattern",
                &["primary_pattern"]
            )
            .expect("Failed to register pattern_analyses_total"),

            rejected_snapshots_total: register_int_counter!(
                "workload_advisor_rejected_snapshots_total",
                "Snapshots rejected by input validation"
            )
            .expect("Failed to register rejected_snapshots_total"),
        }
    }
}

/// Handle to the process-wide advisor metrics.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct AdvisorMetrics {
    inner: &'static AdvisorMetricsInner,
}

impl Default for AdvisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorMetrics {
    /// Create a handle, registering the metrics on first use
    pub fn new() -> Self {
        Self {
            inner: GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new),
        }
    }

    pub fn observe_assessment_latency(&self, duration_secs: f64) {
        self.inner.assessment_latency_seconds.observe(duration_secs);
    }

    pub fn record_classification(&self, result: &ClassificationResult) {
        self.inner
            .classifications_total
            .with_label_values(&[result.classification.as_str()])
            .inc();
    }

    pub fn record_pattern_analysis(&self, analysis: &PatternAnalysis) {
        self.inner
            .pattern_analyses_total
            .with_label_values(&[analysis.primary_pattern.as_str()])
            .inc();
    }

    pub fn inc_rejected_snapshots(&self) {
        self.inner.rejected_snapshots_total.inc();
    }

    pub fn classifications_count(&self, classification: &str) -> u64 {
        self.inner
            .classifications_total
            .with_label_values(&[classification])
            .get()
    }

    pub fn rejected_snapshots_count(&self) -> u64 {
        self.inner.rejected_snapshots_total.get()
    }
}

/// Structured logger for advisor events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_classification(&self, result: &ClassificationResult) {
        info!(
            event = "workload_classified",
            service = %self.service,
            instance_id = %result.instance_id,
            classification = %result.classification,
            confidence = result.confidence,
            alternatives = result.alternatives.len(),
            warnings = result.warnings.len(),
            estimated_savings_percent = ?result.estimated_savings_percent,
            recommended_target = ?result.recommended_target,
            "Workload classified"
        );
    }

    pub fn log_patterns(&self, analysis: &PatternAnalysis) {
        info!(
            event = "patterns_analyzed",
            service = %self.service,
            instance_id = %analysis.instance_id,
            primary_pattern = %analysis.primary_pattern,
            confidence = analysis.confidence,
            analysis_period_days = analysis.analysis_period_days,
            memory_leak = analysis.memory.has_memory_leak,
            "Usage patterns analyzed"
        );
    }

    pub fn log_rejected(&self, instance_id: &str, error: &SnapshotError) {
        warn!(
            event = "snapshot_rejected",
            service = %self.service,
            instance_id = %instance_id,
            error = %error,
            "Snapshot rejected"
        );
    }

    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            port = port,
            "Workload advisor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Workload advisor shutting down"
        );
    }
}
