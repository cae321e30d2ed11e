//! Application configuration.
//!
//! - [`RetryPolicy`] - retry/backoff/deadline for completion calls
//! - [`SessionLimits`] - session store bounds and read mode

pub mod retry_policy;
pub mod session_limits;

pub use retry_policy::RetryPolicy;
pub use session_limits::SessionLimits;
