//! Presentation layer for chat-relay
//!
//! This crate contains the HTTP API, CLI definitions, console
//! formatting, progress indication and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
pub use server::ChatServer;
