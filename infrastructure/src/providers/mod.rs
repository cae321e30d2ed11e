//! Completion API adapters
//!
//! - [`OpenAiCompatibleGateway`] - one HTTP call per `complete`, no retries
//! - [`ResilientGateway`] - wraps any gateway with retry, backoff and a deadline

pub mod openai_compatible;
pub mod resilient;

pub use openai_compatible::OpenAiCompatibleGateway;
pub use resilient::ResilientGateway;
