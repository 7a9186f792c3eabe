//! Workload advisor service
//!
//! Exposes the advisor core over JSON/HTTP alongside health probes and
//! Prometheus metrics.

pub mod api;
pub mod config;
pub mod error;

pub use api::{create_router, AppState};
pub use error::{ApiError, ErrorResponse};
