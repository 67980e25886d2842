use tracing::info;

use crate::backend::EchoBackend;
use crate::errors::AppError;
use crate::models::{now_millis, ChatRequest, ChatResponse};

#[derive(Clone)]
pub struct RelayService {
    backend: EchoBackend,
}

impl RelayService {
    pub fn new(backend: EchoBackend) -> Self {
        Self { backend }
    }

    /// Runs one relay turn: hand the message to the backend as-is and stamp
    /// the reply with the server clock.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        info!(
            client_timestamp = ?request.timestamp,
            "Relaying message ({} chars)",
            request.message.len()
        );

        let response = self.backend.answer(&request.message).await?;

        Ok(ChatResponse { response, timestamp: now_millis() })
    }
}
