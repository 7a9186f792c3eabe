//! Usage pattern detection
//!
//! Six independent sub-analyses over a CPU series (plus an optional memory
//! series) followed by a primary-pattern selection:
//! - Idle stretches
//! - Bursts above a dynamic baseline
//! - Day/night and weekday/weekend cycles
//! - Memory pressure and leaks
//! - Long-term trend

mod burst;
mod detector;
mod idle;
mod memory;
mod recommend;
mod seasonality;
mod trend;

pub use burst::{analyze_bursts, BurstInterval, BurstPattern};
pub use detector::{PatternAnalysis, PatternDetector, PatternScores, PatternType};
pub use idle::{analyze_idle, IdlePattern};
pub use memory::{analyze_memory, MemoryPattern};
pub use recommend::recommendations;
pub use seasonality::{analyze_diurnal, analyze_weekly, DiurnalPattern, WeeklyPattern};
pub use trend::{analyze_trend, daily_means, leak_rate, TrendDirection, TrendPattern};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }
}
