//! Request and response bodies of the HTTP API.

use relay_domain::{Message, Role};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
///
/// `message` is optional at the wire level so a missing field is reported
/// as invalid input rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Body of a successful `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    pub seq: u64,
}

impl From<Message> for HistoryMessage {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            content: message.content,
            seq: message.seq,
        }
    }
}

/// Body of `GET /chat/{session_id}/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<HistoryMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error category (`invalid_input`, `not_found`, `timeout`, `upstream_error`).
    pub error: String,
    pub message: String,
}
