use axum::{
    routing::{get, post},
    Router,
};
use reward_core::SessionManager;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::apis;
use crate::error::{handle_not_found, panic_response};

/// Configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    pub address: String,
}

impl ServerConfig {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

/// Server state holding the session manager
#[derive(Clone)]
pub struct ServerState {
    pub session_manager: Arc<SessionManager>,
}

impl ServerState {
    pub fn new(session_manager: SessionManager) -> Self {
        Self {
            session_manager: Arc::new(session_manager),
        }
    }
}

pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/reward/start", post(apis::handle_start))
        .route("/reward/confirm", post(apis::handle_confirm))
        .route("/reward/status/{session_id}", get(apis::handle_status))
        .route("/health", get(apis::handle_health))
        .fallback(handle_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and serve until Ctrl+C
pub async fn start_server(
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = ServerState::new(SessionManager::new());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.address).await?;

    println!("Server starting on \x1b[1mhttp://{}\x1b[0m", config.address);
    println!("\nAvailable endpoints:");
    println!("  \x1b[1mPOST /reward/start\x1b[0m               - Create a reward session");
    println!("  \x1b[1mPOST /reward/confirm\x1b[0m             - Confirm a reward");
    println!("  \x1b[1mGET  /reward/status/:sessionId\x1b[0m   - Check session status");
    println!("  \x1b[1mGET  /health\x1b[0m                     - Health check");
    println!("\nPress Ctrl+C to stop\n");

    info!("HTTP server listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
