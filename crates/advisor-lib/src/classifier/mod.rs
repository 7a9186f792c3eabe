//! Migration-target classification
//!
//! Scores four mutually exclusive candidates for a workload snapshot, picks
//! the best and derives warnings plus a savings/sizing estimate:
//! - Event-driven function
//! - Managed container
//! - Spot capacity
//! - Keep as is
//!
//! Scoring sits behind [`CandidateScorer`]; selection, alternatives, warnings
//! and estimates stay here regardless of the scorer.

mod estimate;
mod periodicity;
mod scoring;

pub use estimate::{estimate_savings, warnings, SavingsEstimate};
pub use periodicity::{detect_periodicity, lag_correlation};
pub use scoring::{
    score_container_candidate, score_function_candidate, score_keep_as_is, score_spot_candidate,
    CandidateScorer, HeuristicScorer,
};

use crate::config::ClassifierConfig;
use crate::models::WorkloadSnapshot;
use crate::stats::StatisticsSummary;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Migration target for a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    FunctionCandidate,
    ContainerCandidate,
    SpotCandidate,
    KeepAsIs,
}

impl Classification {
    /// All candidates; equal scores keep this order
    pub const ALL: [Classification; 4] = [
        Classification::FunctionCandidate,
        Classification::ContainerCandidate,
        Classification::SpotCandidate,
        Classification::KeepAsIs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::FunctionCandidate => "function_candidate",
            Classification::ContainerCandidate => "container_candidate",
            Classification::SpotCandidate => "spot_candidate",
            Classification::KeepAsIs => "keep_as_is",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score of one candidate with the reasons behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub classification: Classification,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Runner-up candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub classification: Classification,
    pub score: f64,
}

/// Outcome of classifying one workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub instance_id: String,
    pub classification: Classification,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub metrics_summary: StatisticsSummary,
    /// Descending by score, all above the alternative threshold
    pub alternatives: Vec<Alternative>,
    pub warnings: Vec<String>,
    pub estimated_savings_percent: Option<f64>,
    pub recommended_target: Option<String>,
}

/// Workload classifier
#[derive(Clone)]
pub struct WorkloadClassifier {
    config: ClassifierConfig,
    scorer: Arc<dyn CandidateScorer>,
}

impl fmt::Debug for WorkloadClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadClassifier")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl Default for WorkloadClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl WorkloadClassifier {
    /// Classifier with the fixed-weight heuristic scorer
    pub fn new(config: ClassifierConfig) -> Self {
        let scorer = Arc::new(HeuristicScorer::new(config.clone()));
        Self { config, scorer }
    }

    /// Classifier with a custom scorer
    pub fn with_scorer(config: ClassifierConfig, scorer: impl CandidateScorer + 'static) -> Self {
        Self {
            config,
            scorer: Arc::new(scorer),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Classify one workload.
    ///
    /// The CPU series must be sorted by timestamp; other series are only
    /// summarized.
    pub fn classify(&self, snapshot: &WorkloadSnapshot) -> ClassificationResult {
        let summary = StatisticsSummary::from_snapshot(snapshot, self.config.idle_threshold_cpu);

        let mut scores: Vec<CandidateScore> = Classification::ALL
            .iter()
            .map(|candidate| self.scorer.score(*candidate, snapshot, &summary))
            .collect();

        // Stable: equal scores keep declaration order
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let best = scores.remove(0);
        let alternatives: Vec<Alternative> = scores
            .iter()
            .filter(|c| c.score > self.config.alternative_min_score)
            .map(|c| Alternative {
                classification: c.classification,
                score: c.score,
            })
            .collect();

        let warnings = warnings(best.classification, snapshot, &summary, &self.config);
        let estimate = estimate_savings(best.classification, snapshot, &summary, &self.config);
        let confidence = best.score.clamp(0.0, 1.0);

        debug!(
            instance_id = %snapshot.instance_id,
            scorer = self.scorer.name(),
            classification = %best.classification,
            confidence = confidence,
            alternatives = alternatives.len(),
            warnings = warnings.len(),
            "Workload classified"
        );

        ClassificationResult {
            instance_id: snapshot.instance_id.clone(),
            classification: best.classification,
            confidence,
            reasons: best.reasons,
            metrics_summary: summary,
            alternatives,
            warnings,
            estimated_savings_percent: estimate.savings_percent,
            recommended_target: estimate.target,
        }
    }
}

/// Classify many workloads with one configuration
pub fn classify_workloads(
    snapshots: &[WorkloadSnapshot],
    config: &ClassifierConfig,
) -> Vec<ClassificationResult> {
    let classifier = WorkloadClassifier::new(config.clone());
    snapshots.iter().map(|s| classifier.classify(s)).collect()
}
