//! roomcast server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use roomcast::config::{GatewayConfig, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        socket_buffer_capacity = config.socket_buffer_capacity,
        "starting roomcast"
    );

    roomcast::server::serve(&config).await?;

    Ok(())
}
