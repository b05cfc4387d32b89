use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tray_router_server::{AppState, build_router, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    let addr = config.addr;
    let state = Arc::new(AppState { config });
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "tray-router-server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
