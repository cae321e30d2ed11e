//! HTTP API
//!
//! Exposes the relay over JSON:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /chat` | relay a message, returns `{reply, session_id}` |
//! | `GET /chat/{session_id}/history` | ordered history of a session |
//! | `GET /health` | liveness probe |
//!
//! Errors are returned as `{"error": kind, "message": text}` with a status
//! derived from the error kind (400, 404, 504, 502).

mod error;
mod handlers;
pub mod types;

pub use error::ApiError;

use axum::Router;
use axum::routing::{get, post};
use relay_application::RelayChatUseCase;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// State shared by all handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    use_case: RelayChatUseCase,
}

/// HTTP front-end for [`RelayChatUseCase`].
pub struct ChatServer {
    use_case: RelayChatUseCase,
    cors: bool,
}

impl ChatServer {
    pub fn new(use_case: RelayChatUseCase) -> Self {
        Self {
            use_case,
            cors: true,
        }
    }

    /// Allow cross-origin requests from any origin (on by default).
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Build the router without binding a socket.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/chat", post(handlers::post_chat))
            .route("/chat/{session_id}/history", get(handlers::get_history))
            .route("/health", get(handlers::health))
            .with_state(AppState {
                use_case: self.use_case.clone(),
            })
            .layer(TraceLayer::new_for_http());

        if self.cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind `addr` and serve until Ctrl+C.
    pub async fn run(self, addr: &str) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            addr = %listener.local_addr()?,
            model = %self.use_case.model(),
            cors = self.cors,
            "Chat relay listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server..."),
        Err(e) => {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
