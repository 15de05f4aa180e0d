//! HTTP server for the index page and neighborhood API.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{index_handler, show_handler, AppState};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/resources/show", get(show_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server bound to a single address.
pub struct HttpServer {
    state: AppState,
    bind: String,
}

impl HttpServer {
    pub fn new(state: AppState, bind: impl Into<String>) -> Self {
        Self {
            state,
            bind: bind.into(),
        }
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.bind).await?;
        tracing::info!(addr = %listener.local_addr()?, "Topograph listening");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
