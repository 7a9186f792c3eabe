//! HTTP API: probes, metrics and the advisor endpoints

use crate::error::ApiError;
use advisor_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{AdvisorMetrics, StructuredLogger},
    AdvisorConfig, MetricSeries, PatternAnalysis, WorkloadAdvisor, WorkloadAssessment,
    WorkloadSnapshot,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub advisor: WorkloadAdvisor,
    pub health_registry: HealthRegistry,
    pub metrics: AdvisorMetrics,
    pub logger: StructuredLogger,
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(
        advisor: WorkloadAdvisor,
        health_registry: HealthRegistry,
        metrics: AdvisorMetrics,
        logger: StructuredLogger,
        max_batch_size: usize,
    ) -> Self {
        Self {
            advisor,
            health_registry,
            metrics,
            logger,
            max_batch_size,
        }
    }

    fn reject(&self, instance_id: &str, error: advisor_lib::SnapshotError) -> ApiError {
        self.metrics.inc_rejected_snapshots();
        self.logger.log_rejected(instance_id, &error);
        ApiError::from(error)
    }

    fn assess(&self, snapshot: &WorkloadSnapshot) -> WorkloadAssessment {
        let started = Instant::now();
        let assessment = self.advisor.assess(snapshot);
        self.metrics
            .observe_assessment_latency(started.elapsed().as_secs_f64());

        self.metrics.record_classification(&assessment.classification);
        self.logger.log_classification(&assessment.classification);
        if let Some(patterns) = &assessment.patterns {
            self.metrics.record_pattern_analysis(patterns);
            self.logger.log_patterns(patterns);
        }
        assessment
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    pub workloads: Vec<WorkloadSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<WorkloadAssessment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatternRequest {
    pub instance_id: String,
    pub cpu_utilization: MetricSeries,
    #[serde(default)]
    pub memory_utilization: Option<MetricSeries>,
}

/// 200 while operational (degraded included), 503 otherwise
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

async fn classify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WorkloadSnapshot>, JsonRejection>,
) -> Result<Json<WorkloadAssessment>, ApiError> {
    let Json(snapshot) = payload?;
    snapshot
        .validate()
        .map_err(|e| state.reject(&snapshot.instance_id, e))?;

    Ok(Json(state.assess(&snapshot)))
}

async fn classify_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload?;
    let size = request.workloads.len();
    if size > state.max_batch_size {
        return Err(ApiError::BatchTooLarge {
            size,
            max: state.max_batch_size,
        });
    }

    // All-or-nothing: one bad snapshot rejects the batch
    for (index, snapshot) in request.workloads.iter().enumerate() {
        if let Err(e) = snapshot.validate() {
            let error = state.reject(&snapshot.instance_id, e);
            return Err(ApiError::Validation(format!("workloads[{index}]: {error}")));
        }
    }

    let results = request
        .workloads
        .iter()
        .map(|snapshot| state.assess(snapshot))
        .collect();
    info!(workloads = size, "Batch assessed");

    Ok(Json(BatchResponse { results }))
}

async fn patterns(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PatternRequest>, JsonRejection>,
) -> Result<Json<PatternAnalysis>, ApiError> {
    let Json(request) = payload?;
    let snapshot = WorkloadSnapshot::new(request.instance_id, String::new())
        .with_cpu(request.cpu_utilization)
        .with_memory(request.memory_utilization.unwrap_or_default());
    snapshot
        .validate()
        .map_err(|e| state.reject(&snapshot.instance_id, e))?;

    let analysis = state.advisor.detector().analyze_snapshot(&snapshot);
    state.metrics.record_pattern_analysis(&analysis);
    state.logger.log_patterns(&analysis);

    Ok(Json(analysis))
}

async fn effective_config(State(state): State<Arc<AppState>>) -> Json<AdvisorConfig> {
    Json(state.advisor.config().clone())
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/v1/classify", post(classify))
        .route("/v1/classify/batch", post(classify_batch))
        .route("/v1/patterns", post(patterns))
        .route("/v1/config", get(effective_config))
        .with_state(state)
}

/// Serve the API until `shutdown` resolves
pub async fn serve(
    port: u16,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
