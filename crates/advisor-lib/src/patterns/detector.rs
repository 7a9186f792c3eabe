//! Pattern detector and primary-pattern selection

use super::{
    analyze_bursts, analyze_diurnal, analyze_idle, analyze_memory, analyze_trend,
    analyze_weekly, recommendations, BurstPattern, DiurnalPattern, IdlePattern, MemoryPattern,
    TrendDirection, TrendPattern, WeeklyPattern,
};
use crate::config::DetectorConfig;
use crate::models::{MetricPoint, WorkloadSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Usage shape of a workload.
///
/// Declaration order doubles as the tie-break when two candidate scores are
/// exactly equal: the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    IdleDominant,
    SteadyState,
    Bursty,
    Diurnal,
    Weekly,
    Batch,
    Growing,
    Declining,
    Erratic,
}

impl PatternType {
    /// Scored candidates in tie-break order (erratic is the fallback, never scored)
    pub const CANDIDATES: [PatternType; 8] = [
        PatternType::IdleDominant,
        PatternType::SteadyState,
        PatternType::Bursty,
        PatternType::Diurnal,
        PatternType::Weekly,
        PatternType::Batch,
        PatternType::Growing,
        PatternType::Declining,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::IdleDominant => "idle_dominant",
            PatternType::SteadyState => "steady_state",
            PatternType::Bursty => "bursty",
            PatternType::Diurnal => "diurnal",
            PatternType::Weekly => "weekly",
            PatternType::Batch => "batch",
            PatternType::Growing => "growing",
            PatternType::Declining => "declining",
            PatternType::Erratic => "erratic",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete pattern analysis for a workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub instance_id: String,
    /// Whole days between the first and last CPU sample
    pub analysis_period_days: i64,
    pub primary_pattern: PatternType,
    pub idle: IdlePattern,
    pub burst: BurstPattern,
    pub diurnal: DiurnalPattern,
    pub weekly: WeeklyPattern,
    pub memory: MemoryPattern,
    pub trend: TrendPattern,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

/// Heuristic score for every candidate pattern, in tie-break order
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScores {
    scores: [(PatternType, f64); 8],
}

impl PatternScores {
    pub fn compute(
        idle: &IdlePattern,
        burst: &BurstPattern,
        diurnal: &DiurnalPattern,
        weekly: &WeeklyPattern,
        trend: &TrendPattern,
        config: &DetectorConfig,
    ) -> Self {
        let idle_score = if idle.is_idle_dominant {
            0.8 + (idle.idle_percent - config.idle_dominant_percent) / 100.0
        } else {
            0.0
        };

        let bursty_score = if burst.is_bursty {
            (0.5 + burst.avg_burst_intensity / 10.0 + burst.burst_count as f64 / 50.0).min(0.95)
        } else {
            0.0
        };

        let diurnal_score = if diurnal.has_diurnal_pattern {
            (0.5 + (diurnal.peak_to_trough_ratio - config.diurnal_significance) / 3.0).min(0.9)
        } else {
            0.0
        };

        let weekly_score = if weekly.has_weekly_pattern {
            let diff = (weekly.weekday_avg - weekly.weekend_avg).abs() / weekly.weekday_avg.max(1.0);
            (0.5 + diff).min(0.85)
        } else {
            0.0
        };

        let trend_score = 0.5 + trend.r_squared * 0.4;
        let well_fitted = trend.r_squared > config.trend_min_r_squared;
        let growing_score = if trend.direction == TrendDirection::Growing && well_fitted {
            trend_score
        } else {
            0.0
        };
        let declining_score = if trend.direction == TrendDirection::Declining && well_fitted {
            trend_score
        } else {
            0.0
        };

        let batch_score = if burst.is_bursty
            && (diurnal.has_diurnal_pattern || weekly.has_weekly_pattern)
        {
            (bursty_score + 0.2).min(0.95)
        } else {
            0.0
        };

        let steady_score = if !idle.is_idle_dominant
            && !burst.is_bursty
            && diurnal.peak_to_trough_ratio < config.diurnal_significance
        {
            0.7
        } else {
            0.0
        };

        let score_of = |pattern: PatternType| match pattern {
            PatternType::IdleDominant => idle_score,
            PatternType::SteadyState => steady_score,
            PatternType::Bursty => bursty_score,
            PatternType::Diurnal => diurnal_score,
            PatternType::Weekly => weekly_score,
            PatternType::Batch => batch_score,
            PatternType::Growing => growing_score,
            PatternType::Declining => declining_score,
            PatternType::Erratic => 0.0,
        };

        Self {
            scores: PatternType::CANDIDATES.map(|pattern| (pattern, score_of(pattern))),
        }
    }

    pub fn get(&self, pattern: PatternType) -> f64 {
        self.scores
            .iter()
            .find(|(p, _)| *p == pattern)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternType, f64)> + '_ {
        self.scores.iter().copied()
    }

    /// Highest score; on exact ties the earliest pattern in declaration order
    pub fn best(&self) -> (PatternType, f64) {
        let mut best = self.scores[0];
        for candidate in &self.scores[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        best
    }

    /// Primary pattern and its confidence; erratic when nothing scores high enough
    pub fn select(&self, config: &DetectorConfig) -> (PatternType, f64) {
        let (pattern, score) = self.best();
        if score < config.erratic_threshold {
            return (PatternType::Erratic, config.erratic_confidence.clamp(0.0, 1.0));
        }
        (pattern, score.clamp(0.0, 1.0))
    }
}

/// Detects and analyzes usage patterns in utilization metrics
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: DetectorConfig,
}

impl PatternDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run every sub-analysis and pick the primary pattern.
    ///
    /// Both series must be sorted by timestamp. An absent or empty memory
    /// series yields the neutral memory analysis.
    pub fn analyze(
        &self,
        instance_id: &str,
        cpu: &[MetricPoint],
        memory: Option<&[MetricPoint]>,
    ) -> PatternAnalysis {
        let config = &self.config;

        let idle = analyze_idle(cpu, config);
        let burst = analyze_bursts(cpu, config);
        let diurnal = analyze_diurnal(cpu, config);
        let weekly = analyze_weekly(cpu, config);
        let trend = analyze_trend(cpu, config);
        let memory = memory
            .map(|series| analyze_memory(series, config))
            .unwrap_or_default();

        let scores = PatternScores::compute(&idle, &burst, &diurnal, &weekly, &trend, config);
        let (primary_pattern, confidence) = scores.select(config);

        debug!(
            instance_id = %instance_id,
            samples = cpu.len(),
            idle_percent = idle.idle_percent,
            burst_count = burst.burst_count,
            diurnal = diurnal.has_diurnal_pattern,
            weekly = weekly.has_weekly_pattern,
            trend = %trend.direction,
            primary_pattern = %primary_pattern,
            confidence = confidence,
            "Pattern analysis complete"
        );

        let analysis_period_days = match (cpu.first(), cpu.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).num_days(),
            _ => 0,
        };

        let mut analysis = PatternAnalysis {
            instance_id: instance_id.to_string(),
            analysis_period_days,
            primary_pattern,
            idle,
            burst,
            diurnal,
            weekly,
            memory,
            trend,
            confidence,
            recommendations: Vec::new(),
        };
        analysis.recommendations = recommendations(&analysis, config);
        analysis
    }

    /// Analyze the CPU and memory series of a snapshot
    pub fn analyze_snapshot(&self, snapshot: &WorkloadSnapshot) -> PatternAnalysis {
        let memory = (!snapshot.memory_utilization.is_empty())
            .then_some(snapshot.memory_utilization.as_slice());
        self.analyze(&snapshot.instance_id, &snapshot.cpu_utilization, memory)
    }
}
