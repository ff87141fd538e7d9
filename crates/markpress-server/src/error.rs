//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use markpress_config::ConfigError;
use markpress_render::RenderError;
use markpress_routes::RouteError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Render error from markpress-render.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Route discovery or binding error.
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Invalid listen address.
    #[error("Invalid address {0}")]
    Address(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Render(RenderError::FileNotFound(path)) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path.display().to_string()}),
            ),
            _ => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
