//! Startup configuration (spec §6): one environment variable for the
//! listen address, one for the request watchdog. `anyhow` wraps parse
//! failures here; the engine crate's own domain errors are typed with
//! `thiserror` instead (see `crate::error::ApiError`).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub struct Config {
    pub addr: SocketAddr,
    pub request_timeout: Duration,
}

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 1800;

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let addr_str = std::env::var("ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr: SocketAddr =
            addr_str.parse().with_context(|| format!("ENGINE_ADDR '{addr_str}' is not a valid socket address"))?;

        let timeout_secs = match std::env::var("ENGINE_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().with_context(|| format!("ENGINE_REQUEST_TIMEOUT_SECS '{raw}' is not a valid integer"))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self { addr, request_timeout: Duration::from_secs(timeout_secs) })
    }
}
