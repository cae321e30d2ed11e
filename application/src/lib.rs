//! Application layer for chat-relay
//!
//! This crate contains the session store, the relay use case, port
//! definitions and application configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod ports;
pub mod session_store;
pub mod use_cases;

// Re-export commonly used types
pub use config::{RetryPolicy, SessionLimits};
pub use ports::completion_gateway::{CompletionGateway, GatewayError};
pub use session_store::{SessionGuard, SessionStore, StoreError};
pub use use_cases::relay_chat::{
    ErrorKind, RelayChatError, RelayChatInput, RelayChatOutput, RelayChatUseCase,
};
