//! Integration tests for the advisor API endpoints

use advisor_lib::{
    health::{components, HealthRegistry},
    observability::{AdvisorMetrics, StructuredLogger},
    AdvisorConfig, MetricPoint, MetricSeries, WorkloadAdvisor, WorkloadSnapshot,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use workload_advisor::{create_router, AppState};

async fn setup_test_app(max_batch_size: usize) -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register_all(&components::ALL).await;

    let state = Arc::new(AppState::new(
        WorkloadAdvisor::new(AdvisorConfig::default()),
        health_registry,
        AdvisorMetrics::new(),
        StructuredLogger::new("api-tests"),
        max_batch_size,
    ));
    (create_router(state.clone()), state)
}

fn hourly(len: usize, f: impl Fn(usize) -> f64) -> MetricSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..len)
        .map(|i| MetricPoint::new(start + Duration::hours(i as i64), f(i)))
        .collect()
}

fn sporadic_snapshot(id: &str) -> WorkloadSnapshot {
    WorkloadSnapshot::new(id, "m5.large")
        .with_cpu(hourly(336, |i| if i % 30 == 0 { 90.0 } else { 2.0 }))
        .with_memory(hourly(336, |_| 25.0))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz_reports_components() {
    let (app, _state) = setup_test_app(10).await;

    let (status, health) = send(app, get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["components"]["classifier"]["status"], "healthy");
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app(10).await;
    state
        .health_registry
        .set_unhealthy(components::CONFIG, "Invalid thresholds")
        .await;

    let (status, health) = send(app, get("/healthz")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_follows_initialization() {
    let (app, state) = setup_test_app(10).await;

    let (status, readiness) = send(app.clone(), get("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(readiness["ready"], false);

    state.health_registry.set_ready(true).await;
    let (status, readiness) = send(app, get("/readyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_classify_returns_assessment() {
    let (app, _state) = setup_test_app(10).await;

    let (status, body) = send(app, post_json("/v1/classify", &sporadic_snapshot("i-fn"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"]["instance_id"], "i-fn");
    assert_eq!(body["classification"]["classification"], "function_candidate");
    let confidence = body["classification"]["confidence"].as_f64().unwrap();
    assert!(confidence > 0.5 && confidence <= 1.0);
    assert_eq!(body["patterns"]["primary_pattern"], "idle_dominant");
}

#[tokio::test]
async fn test_classify_rejects_unsorted_snapshot() {
    let (app, state) = setup_test_app(10).await;
    let mut snapshot = sporadic_snapshot("i-bad");
    snapshot.cpu_utilization.swap(3, 4);
    let rejected_before = state.metrics.rejected_snapshots_count();

    let (status, body) = send(app, post_json("/v1/classify", &snapshot)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_SNAPSHOT");
    assert!(body["error"].as_str().unwrap().contains("cpu_utilization"));
    assert!(state.metrics.rejected_snapshots_count() > rejected_before);
}

#[tokio::test]
async fn test_classify_rejects_malformed_body() {
    let (app, _state) = setup_test_app(10).await;
    let request = Request::builder()
        .method("POST")
        .uri("/v1/classify")
        .header("content-type", "application/json")
        .body(Body::from("{\"instance_id\": "))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_batch_preserves_order() {
    let (app, _state) = setup_test_app(10).await;
    let request = json!({
        "workloads": [sporadic_snapshot("i-1"), WorkloadSnapshot::new("i-2", "t3.micro")]
    });

    let (status, body) = send(app, post_json("/v1/classify/batch", &request)).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["classification"]["instance_id"], "i-1");
    assert_eq!(results[1]["classification"]["instance_id"], "i-2");
    assert_eq!(results[1]["classification"]["classification"], "keep_as_is");
    assert!(results[1].get("patterns").is_none());
}

#[tokio::test]
async fn test_batch_size_limit() {
    let (app, _state) = setup_test_app(1).await;
    let request = json!({
        "workloads": [WorkloadSnapshot::new("i-1", "m5.large"), WorkloadSnapshot::new("i-2", "m5.large")]
    });

    let (status, body) = send(app, post_json("/v1/classify/batch", &request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "BATCH_TOO_LARGE");
}

#[tokio::test]
async fn test_batch_rejects_invalid_member() {
    let (app, _state) = setup_test_app(10).await;
    let request = json!({
        "workloads": [sporadic_snapshot("i-ok"), WorkloadSnapshot::new("", "m5.large")]
    });

    let (status, body) = send(app, post_json("/v1/classify/batch", &request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("workloads[1]"));
}

#[tokio::test]
async fn test_patterns_endpoint() {
    let (app, _state) = setup_test_app(10).await;
    let request = json!({
        "instance_id": "i-office",
        "cpu_utilization": hourly(168, |i| if (9..=17).contains(&(i % 24)) { 80.0 } else { 10.0 }),
    });

    let (status, body) = send(app, post_json("/v1/patterns", &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["instance_id"], "i-office");
    assert_eq!(body["diurnal"]["has_diurnal_pattern"], true);
    assert!(body["diurnal"]["peak_to_trough_ratio"].as_f64().unwrap() > 3.0);
    let peak = body["diurnal"]["peak_hour"].as_u64().unwrap();
    assert!((9..=17).contains(&peak));
}

#[tokio::test]
async fn test_config_endpoint_returns_defaults() {
    let (app, _state) = setup_test_app(10).await;

    let (status, body) = send(app, get("/v1/config")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detector"]["idle_threshold_cpu"], 5.0);
    assert_eq!(body["classifier"]["periodicity"]["lags"], json!([24, 168]));
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_advisor_metrics() {
    let (app, _state) = setup_test_app(10).await;
    let _ = send(
        app.clone(),
        post_json("/v1/classify", &sporadic_snapshot("i-metrics")),
    )
    .await;

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("workload_advisor_classifications_total"));
    assert!(text.contains("workload_advisor_assessment_latency_seconds"));
}
