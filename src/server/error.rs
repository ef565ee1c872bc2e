//! Mapping blog errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::BlogError;

/// Error returned by request handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Blog(#[from] BlogError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Blog(e) = &self {
            if e.is_client_error() {
                tracing::debug!("Rejected request: {}", e);
            }
        }

        match self {
            ApiError::Blog(BlogError::NotFound(slug)) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Post not found: {}", slug) })),
            )
                .into_response(),
            ApiError::Blog(BlogError::Validation { field, message }) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "field": field })),
            )
                .into_response(),
            // Details stay in the log
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
