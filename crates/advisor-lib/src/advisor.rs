//! Combined classification and pattern analysis
//!
//! [`WorkloadAdvisor`] owns one classifier and one detector built from the
//! same [`AdvisorConfig`] and runs both over a snapshot.

use crate::classifier::{ClassificationResult, WorkloadClassifier};
use crate::config::AdvisorConfig;
use crate::models::WorkloadSnapshot;
use crate::patterns::{PatternAnalysis, PatternDetector};
use serde::{Deserialize, Serialize};

/// Everything the advisor knows about one workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadAssessment {
    pub classification: ClassificationResult,
    /// Absent when the snapshot has no CPU samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<PatternAnalysis>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkloadAdvisor {
    config: AdvisorConfig,
    classifier: WorkloadClassifier,
    detector: PatternDetector,
}

impl WorkloadAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self {
            classifier: WorkloadClassifier::new(config.classifier.clone()),
            detector: PatternDetector::new(config.detector.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn classifier(&self) -> &WorkloadClassifier {
        &self.classifier
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    pub fn assess(&self, snapshot: &WorkloadSnapshot) -> WorkloadAssessment {
        let classification = self.classifier.classify(snapshot);
        let patterns = (!snapshot.cpu_utilization.is_empty())
            .then(|| self.detector.analyze_snapshot(snapshot));

        WorkloadAssessment {
            classification,
            patterns,
        }
    }

    /// Assess snapshots in order; each result equals a single `assess` call
    pub fn assess_batch(&self, snapshots: &[WorkloadSnapshot]) -> Vec<WorkloadAssessment> {
        snapshots.iter().map(|s| self.assess(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use crate::models::{MetricPoint, MetricSeries};
    use crate::patterns::PatternType;
    use chrono::{Duration, TimeZone, Utc};

    fn hourly(len: usize, f: impl Fn(usize) -> f64) -> MetricSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        (0..len)
            .map(|i| MetricPoint::new(start + Duration::hours(i as i64), f(i)))
            .collect()
    }

    #[test]
    fn test_assess_runs_both_engines() {
        let snapshot = WorkloadSnapshot::new("i-idle", "m5.large")
            .with_cpu(hourly(336, |i| if i % 40 == 0 { 80.0 } else { 2.0 }))
            .with_memory(hourly(336, |_| 30.0));

        let assessment = WorkloadAdvisor::default().assess(&snapshot);

        assert_eq!(
            assessment.classification.classification,
            Classification::FunctionCandidate
        );
        let patterns = assessment.patterns.expect("cpu series present");
        assert_eq!(patterns.primary_pattern, PatternType::IdleDominant);
        assert_eq!(patterns.memory.avg_utilization, 30.0);
    }

    #[test]
    fn test_no_cpu_means_no_patterns() {
        let snapshot = WorkloadSnapshot::new("i-bare", "t3.micro");
        let assessment = WorkloadAdvisor::default().assess(&snapshot);

        assert!(assessment.patterns.is_none());
        let json = serde_json::to_value(&assessment).unwrap();
        assert!(json.get("patterns").is_none());
    }

    #[test]
    fn test_batch_is_order_preserving() {
        let advisor = WorkloadAdvisor::new(AdvisorConfig::default());
        let snapshots: Vec<WorkloadSnapshot> = (0..3)
            .map(|n| {
                WorkloadSnapshot::new(format!("i-{n}"), "m5.large")
                    .with_cpu(hourly(100, move |i| (i % 10) as f64 * (n + 1) as f64))
            })
            .collect();

        let batch = advisor.assess_batch(&snapshots);
        let ids: Vec<&str> = batch
            .iter()
            .map(|a| a.classification.instance_id.as_str())
            .collect();
        assert_eq!(ids, vec!["i-0", "i-1", "i-2"]);
        for (snapshot, assessment) in snapshots.iter().zip(&batch) {
            assert_eq!(&advisor.assess(snapshot), assessment);
        }
    }

    #[test]
    fn test_extreme_integer_settings_do_not_abort_assessment() {
        let mut config = AdvisorConfig::default();
        config.classifier.periodicity.lags = vec![usize::MAX];
        config.detector.min_burst_duration_minutes = i64::MAX;
        config.detector.projection_days = u32::MAX;
        assert!(config.validate().is_err());

        let snapshot = WorkloadSnapshot::new("i-extreme", "m5.large")
            .with_cpu(hourly(336, |i| 20.0 + (i / 24) as f64 * 2.0 + (i % 20) as f64))
            .with_memory(hourly(336, |i| 30.0 + (i / 24) as f64 * 1.5));

        let assessment = WorkloadAdvisor::new(config).assess(&snapshot);

        let patterns = assessment.patterns.expect("cpu series present");
        assert_eq!(patterns.burst.burst_count, 0);
        assert!(patterns.trend.predicted_30_day_value <= 100.0);
        assert!((0.0..=1.0).contains(&assessment.classification.confidence));
    }
}
