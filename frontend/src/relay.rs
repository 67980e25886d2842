use std::cell::Cell;

use gloo_net::http::Request;
use thiserror::Error;

use crate::models::{RelayRequest, RelayResponse};

/// Origin of the local relay server.
const RELAY_ORIGIN: &str = "http://localhost:3001";

/// Everything that can go wrong on the widget side of the relay.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Not connected to the relay server")]
    NotConnected,

    #[error("Failed to connect to the relay server: {0}")]
    ConnectError(String),

    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    DecodeError(String),
}

/// Raw outcome of one HTTP exchange, before any status or body handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP hop and the clock, split out of [`RelayClient`] so the wire
/// contract can be exercised without a browser.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpReply, RelayError>;

    /// Epoch milliseconds used to stamp outgoing requests.
    fn now_millis(&self) -> i64;
}

/// Browser `fetch` via gloo-net.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpReply, RelayError> {
        let resp = Request::post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| RelayError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::DecodeError(e.to_string()))?;

        Ok(HttpReply { status, body })
    }

    fn now_millis(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// Thin client for the relay's chat endpoint. One request per `send`,
/// no retry, no timeout.
pub struct RelayClient<T: Transport = GlooTransport> {
    transport: T,
    endpoint: String,
    connected: Cell<bool>,
}

impl RelayClient<GlooTransport> {
    pub fn new() -> Self {
        Self::with_transport(GlooTransport, RELAY_ORIGIN)
    }
}

impl Default for RelayClient<GlooTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> RelayClient<T> {
    pub fn with_transport(transport: T, origin: &str) -> Self {
        Self {
            transport,
            endpoint: format!("{}/api/chat", origin.trim_end_matches('/')),
            connected: Cell::new(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Marks the client connected. No handshake happens yet, so this
    /// cannot fail today.
    pub async fn connect(&self) -> Result<(), RelayError> {
        self.connected.set(true);
        Ok(())
    }

    pub fn disconnect(&self) {
        self.connected.set(false);
    }

    /// Sends one message and resolves the reply text.
    pub async fn send(&self, message: &str) -> Result<String, RelayError> {
        if !self.is_connected() {
            return Err(RelayError::NotConnected);
        }

        let request = RelayRequest {
            message: message.to_string(),
            timestamp: self.transport.now_millis(),
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| RelayError::DecodeError(e.to_string()))?;

        let reply = self.transport.post_json(&self.endpoint, body).await?;
        if !reply.is_success() {
            return Err(RelayError::HttpError { status: reply.status });
        }

        serde_json::from_str::<RelayResponse>(&reply.body)
            .map(RelayResponse::into_reply)
            .map_err(|e| RelayError::DecodeError(e.to_string()))
    }
}
