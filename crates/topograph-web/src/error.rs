//! Error types for the topograph-web crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use topograph_graph::GraphError;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Seeding failed: {0}")]
    Seed(#[from] topograph_seed::error::SeedError),

    #[error("Malformed traversal result: {0}")]
    MalformedTraversal(String),

    #[error("Missing query parameter: {0}")]
    MissingParam(&'static str),
}

pub type Result<T> = std::result::Result<T, WebError>;

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Graph(GraphError::InvalidNodeRef(_)) | WebError::MissingParam(_) => {
                StatusCode::BAD_REQUEST
            }
            WebError::Graph(GraphError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
