//! LUXE valuation server
//!
//! Serves the valuation form on `/` and renders each prediction next to the
//! precomputed price-trend chart.

mod api;
mod handlers;
mod page;
mod state;

pub use api::create_router;
pub use page::{format_growth, render, PageContext};
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sales history used for the market statistics
    pub data_path: String,
    /// Model artifact written by `luxe train`
    pub model_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| "data/House Price Prediction Dataset.csv".to_string()),
            model_path: std::env::var("MODEL_PATH").unwrap_or_else(|_| "models/model.bin".to_string()),
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        data_path = %config.data_path,
        model_path = %config.model_path,
        started_at = %start_time.to_rfc3339(),
        "Loading dataset and model artifact"
    );

    let state = Arc::new(AppState::load(&config)?);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        url = %format!("http://{}", addr),
        pid = std::process::id(),
        "LUXE House AI listening"
    );

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
