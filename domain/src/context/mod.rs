//! Conversation context selection.
//!
//! - [`ContextBudget`] - how much history may be forwarded per request
//! - [`ContextWindow`] - the suffix of history selected under a budget

pub mod context_budget;
pub mod window;

pub use context_budget::ContextBudget;
pub use window::ContextWindow;
