//! Periodicity detection via lagged correlation

use crate::config::PeriodicityConfig;
use crate::stats::{mean, pearson_correlation};

/// Mean correlation between the first `lag`-long window and every later full
/// window at a multiple of `lag`.
///
/// Returns `None` when the series holds fewer than two full windows.
pub fn lag_correlation(values: &[f64], lag: usize) -> Option<f64> {
    let span = lag.checked_mul(2)?;
    if lag == 0 || values.len() < span {
        return None;
    }

    let first = &values[..lag];
    let correlations: Vec<f64> = values[lag..]
        .chunks_exact(lag)
        .map(|window| pearson_correlation(first, window))
        .collect();

    Some(mean(&correlations))
}

/// True when the series repeats itself at any configured lag
pub fn detect_periodicity(values: &[f64], config: &PeriodicityConfig) -> bool {
    if values.len() < config.min_samples {
        return false;
    }

    config.lags.iter().any(|lag| {
        lag_correlation(values, *lag)
            .map(|corr| corr > config.correlation_threshold)
            .unwrap_or(false)
    })
}
