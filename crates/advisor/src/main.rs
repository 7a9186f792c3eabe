//! Workload Advisor - migration-target classification service

use advisor_lib::{
    health::{components, HealthRegistry},
    observability::{AdvisorMetrics, StructuredLogger},
    WorkloadAdvisor,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workload_advisor::{api, config};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting workload-advisor");

    let service = config::ServiceConfig::load()?;
    let (advisor_config, customized) =
        config::load_advisor_config().context("Failed to load advisor configuration")?;
    info!(
        port = service.port,
        max_batch_size = service.max_batch_size,
        customized,
        "Advisor configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register_all(&components::ALL).await;

    let metrics = AdvisorMetrics::new();
    let logger = StructuredLogger::new(&service.service_name);

    let state = Arc::new(api::AppState::new(
        WorkloadAdvisor::new(advisor_config),
        health_registry.clone(),
        metrics,
        logger.clone(),
        service.max_batch_size,
    ));

    health_registry.set_ready(true).await;
    logger.log_startup(SERVICE_VERSION, service.port);

    api::serve(service.port, state, shutdown_signal()).await?;

    logger.log_shutdown("SIGINT received");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
