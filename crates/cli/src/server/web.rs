use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use mesh_dns_infrastructure::dns::ResolutionChain;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
struct HealthState {
    chain: Arc<ResolutionChain>,
}

#[derive(Debug, Serialize)]
struct StageStatus {
    name: &'static str,
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    requests: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ReadyResponse {
    ready: bool,
    stages: Vec<StageStatus>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn start_health_server(bind_addr: SocketAddr, chain: Arc<ResolutionChain>) -> anyhow::Result<()> {
    info!(bind_address = %bind_addr, "Starting health server");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, create_app(chain)).await?;

    Ok(())
}

fn create_app(chain: Arc<ResolutionChain>) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .route("/health", get(health))
        .with_state(HealthState { chain })
}

async fn ready(State(state): State<HealthState>) -> (StatusCode, Json<ReadyResponse>) {
    let stages: Vec<StageStatus> = state
        .chain
        .stages()
        .iter()
        .map(|stage| StageStatus {
            name: stage.name(),
            ready: stage.ready(),
            requests: stage.request_count(),
        })
        .collect();
    let ready = stages.iter().all(|s| s.ready);

    debug!(ready, "Readiness requested");

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyResponse { ready, stages }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
