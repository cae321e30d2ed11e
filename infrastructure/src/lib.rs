//! Infrastructure layer for chat-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileContextBudgetConfig, FileProviderConfig, FileReplConfig,
    FileRetryConfig, FileServerConfig, FileSessionsConfig,
};
pub use providers::{OpenAiCompatibleGateway, ResilientGateway};
