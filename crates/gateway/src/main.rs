//! `speedaf-gateway` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise tracing (JSON logs, optional OTLP export).
//! 3. Build the [`CarrierClient`] once from the validated credentials.
//! 4. Build the Axum router around it and serve.

use anyhow::{Context, Result};
use tracing::{info, warn};

use speedaf_gateway::carrier::CarrierClient;
use speedaf_gateway::config::Config;
use speedaf_gateway::server::{self, state::AppState};
use speedaf_gateway::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        carrier = %cfg.speedaf_base_url,
        "speedaf-gateway starting"
    );
    if cfg.uses_sandbox_credentials() {
        warn!("SPEEDAF_APP_CODE / SPEEDAF_SECRET_KEY unset; using UAT sandbox placeholders");
    }

    // -----------------------------------------------------------------------
    // 3. Carrier client
    // -----------------------------------------------------------------------
    let carrier = CarrierClient::new(cfg.credentials(), cfg.carrier_timeout())
        .context("failed to build carrier client")?;

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(AppState::new(carrier));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
