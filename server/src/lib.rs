//! HTTP shell over the `tray-router-engine` crate (spec §6). Stateless: the
//! full layout rides along on every request. Split into a library so
//! `server/tests` can drive the `Router` directly without a bound socket.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

pub struct AppState {
    pub config: Config,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(vec![Method::POST]).allow_headers(Any);

    Router::new()
        .route("/api/optimize-paths", post(routes::optimize_paths))
        .route("/api/update-cable-length", post(routes::update_cable_length))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
