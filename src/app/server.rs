use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app::handlers;
use crate::core::assistant::ChatAssistant;
use crate::utils::error::{ChatbotError, Result};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<ChatAssistant>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(assistant: ChatAssistant, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            assistant: Arc::new(assistant),
            static_dir: static_dir.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::get_index))
        .route("/chat", post(handlers::post_chat))
        .route("/health", get(handlers::get_health))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChatbotError::ServerError {
            message: format!("failed to bind {addr}: {e}"),
        })?;

    tracing::info!("🚀 Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ChatbotError::ServerError {
            message: format!("server error: {e}"),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
