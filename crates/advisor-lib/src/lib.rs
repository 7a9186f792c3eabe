//! Workload usage analysis and migration-target classification
//!
//! This crate provides:
//! - Shared statistics over utilization time series
//! - Usage pattern detection (idle, bursts, cycles, memory, trend)
//! - Classification into function, container, spot or keep-as-is targets
//! - Health checks and observability for services embedding the core
//!
//! Every analysis is a pure function of its inputs and the immutable
//! configuration injected at construction.

pub mod advisor;
pub mod classifier;
pub mod config;
pub mod health;
pub mod models;
pub mod observability;
pub mod patterns;
pub mod stats;

pub use advisor::{WorkloadAdvisor, WorkloadAssessment};
pub use classifier::{
    classify_workloads, Alternative, CandidateScore, CandidateScorer, Classification,
    ClassificationResult, HeuristicScorer, WorkloadClassifier,
};
pub use config::{AdvisorConfig, ClassifierConfig, ConfigError, DetectorConfig};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{AdvisorMetrics, StructuredLogger};
pub use patterns::{PatternAnalysis, PatternDetector, PatternType};
pub use stats::{percentile, StatisticsSummary};
