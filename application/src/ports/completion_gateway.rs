//! Completion gateway port
//!
//! Defines the interface for calling a remote chat completion API.

use async_trait::async_trait;
use relay_domain::{Message, Model};
use thiserror::Error;

/// Errors that can occur during completion gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Timeout")]
    Timeout,

    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream { status: Option<u16>, message: String },

    #[error("Request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Classify a non-success HTTP status.
    ///
    /// 429 and 5xx are upstream failures worth retrying; any other status is
    /// treated as a rejection of the request itself.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 429 || status >= 500 {
            GatewayError::Upstream {
                status: Some(status),
                message,
            }
        } else {
            GatewayError::Rejected { status, message }
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout => true,
            GatewayError::Upstream { .. } => true,
            GatewayError::ConnectionError(_) => true,
            GatewayError::Rejected { .. } => false,
            GatewayError::MalformedResponse(_) => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Gateway for chat completions
///
/// This port defines how the application layer reaches the completion API.
/// Implementations (adapters) live in the infrastructure layer. A gateway
/// never touches the session store; the caller decides what to record.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the ordered `messages` to `model` and return the reply text.
    async fn complete(&self, model: &Model, messages: &[Message]) -> Result<String, GatewayError>;
}
