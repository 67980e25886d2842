use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Top-level relay server error.
/// Every variant carries a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Request errors ───────────────────────────────────────────────────────
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

/// The widget only distinguishes success from failure, so every error
/// leaves the server as `500 {error, message}`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: "Failed to process request".to_string(),
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
