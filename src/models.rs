use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`, as sent by the widget's relay client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Client-side epoch milliseconds. Logged, never interpreted, so any
    /// JSON value is accepted.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

/// Body of every non-2xx reply.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
