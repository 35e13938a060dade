//! Router construction and server loop.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, error::ServerError};

use super::{handler, signal::shutdown_signal, state::AppState};

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/api/rooms", get(handler::get_rooms))
        .route(
            "/api/rooms/{room_id}/participants",
            get(handler::get_participants),
        )
        .route("/api/rooms/{room_id}/messages", get(handler::get_messages))
        .route("/ws/rooms/{room_id}", get(handler::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until a shutdown signal arrives
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Bind the configured address and run the server with in-memory rooms
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    serve(listener, Arc::new(AppState::in_memory())).await?;
    tracing::info!("Server stopped");
    Ok(())
}
