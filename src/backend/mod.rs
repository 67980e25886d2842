use tracing::debug;

use crate::errors::AppError;

/// Placeholder for the eventual downstream integration: answers every
/// message with a canned acknowledgement that quotes it back.
#[derive(Clone, Default)]
pub struct EchoBackend;

impl EchoBackend {
    pub fn new() -> Self {
        Self
    }

    pub async fn answer(&self, message: &str) -> Result<String, AppError> {
        debug!("Echo backend answering {} chars", message.len());
        Ok(format!(
            "I received your message: \"{message}\". Relay integration pending."
        ))
    }
}
