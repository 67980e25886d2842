use serde::{Deserialize, Serialize};

/// Shown when the relay answers 2xx but carries neither reply field.
pub const FALLBACK_REPLY: &str = "No response received";

/// Connection status rendered by the header's status dot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Ready,
    Thinking,
    Error,
}

impl ConnectionStatus {
    /// CSS modifier for the status dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Ready => "ready",
            ConnectionStatus::Thinking => "thinking",
            ConnectionStatus::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    Error,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry. `id` is assigned in insertion order and only
/// serves as a stable render key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub text: String,
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, Serialize)]
pub struct RelayRequest {
    pub message: String,
    pub timestamp: i64,
}

/// Body of a relay reply. Success replies carry `response`, error replies
/// carry `message`; both are optional on the wire. The server's `timestamp`
/// is not read.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RelayResponse {
    /// `response`, else `message`, else [`FALLBACK_REPLY`]. Empty strings
    /// count as missing.
    pub fn into_reply(self) -> String {
        self.response
            .filter(|r| !r.is_empty())
            .or(self.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> String {
        serde_json::from_str::<RelayResponse>(json).unwrap().into_reply()
    }

    #[test]
    fn reply_prefers_response_then_message_then_fallback() {
        assert_eq!(reply(r#"{"response":"A"}"#), "A");
        assert_eq!(reply(r#"{"message":"B"}"#), "B");
        assert_eq!(reply(r#"{}"#), FALLBACK_REPLY);
        assert_eq!(reply(r#"{"response":"A","message":"B","timestamp":9}"#), "A");
    }

    #[test]
    fn empty_response_falls_through_to_message() {
        assert_eq!(reply(r#"{"response":"","message":"B"}"#), "B");
        assert_eq!(reply(r#"{"response":null}"#), FALLBACK_REPLY);
    }

    #[test]
    fn reply_ignores_timestamp_shape() {
        assert_eq!(reply(r#"{"response":"A","timestamp":1.5}"#), "A");
        assert_eq!(reply(r#"{"message":"B","timestamp":"soon"}"#), "B");
    }

    #[test]
    fn request_serializes_wire_fields() {
        let body = serde_json::to_value(RelayRequest {
            message: "hello".to_string(),
            timestamp: 1_700_000_000_123,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "message": "hello", "timestamp": 1_700_000_000_123i64 }));
    }
}
