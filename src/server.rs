//! Router assembly and server startup.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::domain::{BroadcastAdaptor, RoomRegistry};
use crate::service::RoomService;
use crate::ws::handler::ws_handler;

/// Builds application state around the given adaptor.
#[must_use]
pub fn build_state(config: &GatewayConfig, adaptor: Arc<dyn BroadcastAdaptor>) -> AppState {
    AppState {
        room_service: Arc::new(RoomService::new(adaptor, config.max_room_name_len)),
        socket_buffer_capacity: config.socket_buffer_capacity,
    }
}

/// Builds the full HTTP + WebSocket router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `config.listen_addr` and serves an in-memory registry until the
/// process ends.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(config: &GatewayConfig) -> std::io::Result<()> {
    let registry: Arc<dyn BroadcastAdaptor> = Arc::new(RoomRegistry::new());
    let app = build_app(build_state(config, registry));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app).await
}
