//! HTTP handlers (spec §6): `POST /api/optimize-paths` and
//! `POST /api/update-cable-length`. Routing itself is CPU-bound synchronous
//! work, so both handlers run the engine inside `spawn_blocking`, mirroring
//! the teacher's `fpga-backend` (which runs its solver the same way). A
//! watchdog cancels the engine's `CancellationToken` once the configured
//! request timeout elapses (spec §5).

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use tracing::{info, warn};
use tray_router_engine::{CancellationToken, OptimizeRequest, OptimizeResponse, UpdateCableLengthRequest, engine};

use crate::AppState;
use crate::error::ApiError;

async fn run_with_watchdog<F>(timeout: Duration, work: F) -> Result<OptimizeResponse, ApiError>
where
    F: FnOnce(CancellationToken) -> Result<OptimizeResponse, tray_router_engine::EngineError> + Send + 'static,
{
    let token = CancellationToken::new();
    let watchdog_token = token.clone();
    let watchdog = tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        watchdog_token.cancel();
    });

    let handle = tokio::task::spawn_blocking(move || work(token));
    let result = handle.await.map_err(|join_err| {
        tray_router_engine::EngineError::internal(format!("engine task panicked: {join_err}"))
    });
    watchdog.abort();

    match result {
        Ok(inner) => inner.map_err(ApiError::from),
        Err(err) => Err(ApiError::from(err)),
    }
}

pub async fn optimize_paths(
    State(state): State<Arc<AppState>>,
    Json(layout): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    info!(cables = layout.cables.len(), networks = layout.networks.len(), "optimize-paths request");
    let timeout = state.config.request_timeout;
    let response = run_with_watchdog(timeout, move |token| engine::optimize_paths(&layout, &token)).await;
    if let Err(ApiError(err)) = &response {
        warn!(error = %err, "optimize-paths failed");
    }
    response.map(Json)
}

pub async fn update_cable_length(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateCableLengthRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    info!(cable_label = %request.cable_label, "update-cable-length request");
    let timeout = state.config.request_timeout;
    let response = run_with_watchdog(timeout, move |token| {
        engine::update_cable_length(&request.full_layout, &request.cable_label, request.new_length, &token)
    })
    .await;
    if let Err(ApiError(err)) = &response {
        warn!(error = %err, "update-cable-length failed");
    }
    response.map(Json)
}
