//! Bounds and read mode for the session store.

use serde::{Deserialize, Serialize};

/// Limits applied by [`SessionStore`](crate::session_store::SessionStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    /// Maximum number of live sessions; the least recently used one is
    /// evicted beyond this. `None` keeps sessions for the process lifetime.
    pub max_sessions: Option<usize>,
    /// Maximum stored messages per session; the oldest are dropped beyond this.
    pub max_messages_per_session: Option<usize>,
    /// Reading an unknown session fails with `NotFound` instead of
    /// returning an empty history.
    pub strict_reads: bool,
}

impl SessionLimits {
    pub fn with_max_sessions(mut self, max: Option<usize>) -> Self {
        self.max_sessions = max;
        self
    }

    pub fn with_max_messages_per_session(mut self, max: Option<usize>) -> Self {
        self.max_messages_per_session = max;
        self
    }

    pub fn with_strict_reads(mut self, strict: bool) -> Self {
        self.strict_reads = strict;
        self
    }
}
