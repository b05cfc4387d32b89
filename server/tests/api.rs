//! Integration tests driving the axum `Router` directly via
//! `tower::ServiceExt::oneshot`, without a bound socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use tray_router_server::config::Config;
use tray_router_server::{AppState, build_router};

fn test_state() -> Arc<AppState> {
    Arc::new(AppState { config: Config::from_env().unwrap_or_else(|_| Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        request_timeout: std::time::Duration::from_secs(30),
    }) })
}

fn layout_json() -> Value {
    let layout = testing_utils::scenario_s1_two_machines();
    serde_json::to_value(layout).unwrap()
}

#[tokio::test]
async fn optimize_paths_returns_a_route() {
    let app = build_router(test_state());
    let body = Body::from(serde_json::to_vec(&layout_json()).unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/api/optimize-paths")
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(payload["cableRoutes"]["cab-1"].is_array());
}

#[tokio::test]
async fn malformed_json_yields_400() {
    let app = build_router(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/api/optimize-paths")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_cable_length_round_trips() {
    let app = build_router(test_state());
    let scenario = testing_utils::scenario_s5_insufficient_length();
    let request_body = json!({
        "cableLabel": "ab",
        "newLength": "3.5",
        "fullLayout": serde_json::to_value(&scenario).unwrap(),
    });

    let request = Request::builder()
        .method("POST")
        .uri("/api/update-cable-length")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&request_body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: Value = serde_json::from_slice(&bytes).unwrap();
    // 3.5m clears "ab" to `good`, so it no longer appears in
    // `problematicCables` at all (only over-length cables are listed).
    let problematic = payload["problematicCables"].as_array().unwrap();
    assert!(problematic.iter().all(|p| p["cableLabel"] != "ab"));
}
