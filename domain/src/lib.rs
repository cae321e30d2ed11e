//! Domain layer for chat-relay
//!
//! This crate contains the conversation entities and the context selection
//! policy. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Session**: an isolated conversation thread keyed by a [`SessionId`]
//! - **Message**: one user or assistant turn, ordered by its `seq` position
//! - **Context window**: the suffix of a session's history that fits a
//!   [`ContextBudget`] and is forwarded to the completion API

pub mod config;
pub mod context;
pub mod core;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use context::{ContextBudget, ContextWindow};
pub use core::{error::DomainError, model::Model};
pub use session::entities::{Message, Role, Session, SessionId};
