use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::error;

use crate::errors::AppError;
use crate::models::{now_millis, ChatRequest, ChatResponse, HealthResponse};
use crate::service::relay_service::RelayService;

/// POST `/api/chat` — relays one message and returns `{response, timestamp}`.
pub async fn chat_handler(
    State(svc): State<RelayService>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = body.map_err(|rejection| {
        error!("Rejected chat request body: {rejection}");
        AppError::InvalidBody { message: rejection.body_text() }
    })?;

    svc.chat(request).await.map(Json).map_err(|err| {
        error!("Error handling chat request: {err}");
        err
    })
}

/// GET `/api/health` — liveness probe.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", timestamp: now_millis() })
}
