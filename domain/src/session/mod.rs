//! Conversation session domain.
//!
//! - [`entities::Session`] - an isolated conversation thread
//! - [`entities::Message`] - a single message within a session
//! - [`entities::SessionId`] - the opaque key a session is stored under
pub mod entities;
