//! Session store configuration from TOML (`[sessions]` section)

use relay_application::SessionLimits;
use serde::{Deserialize, Serialize};

/// Session store bounds. A value of `0` disables that bound.
///
/// # Example
///
/// ```toml
/// [sessions]
/// max_sessions = 500
/// max_messages = 200
/// strict_reads = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionsConfig {
    /// Live sessions kept before the least recently used is evicted.
    pub max_sessions: usize,
    /// Stored messages per session before the oldest are dropped.
    pub max_messages: usize,
    /// Reading an unknown session's history returns 404 instead of `[]`.
    pub strict_reads: bool,
}

impl Default for FileSessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            max_messages: 1_000,
            strict_reads: false,
        }
    }
}

impl FileSessionsConfig {
    pub fn to_session_limits(&self) -> SessionLimits {
        SessionLimits::default()
            .with_max_sessions(Some(self.max_sessions).filter(|&n| n > 0))
            .with_max_messages_per_session(Some(self.max_messages).filter(|&n| n > 0))
            .with_strict_reads(self.strict_reads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_defaults() {
        let limits = FileSessionsConfig::default().to_session_limits();
        assert_eq!(limits.max_sessions, Some(10_000));
        assert_eq!(limits.max_messages_per_session, Some(1_000));
        assert!(!limits.strict_reads);
    }

    #[test]
    fn test_zero_disables_bounds() {
        let config: super::super::FileConfig = toml::from_str(
            "[sessions]\nmax_sessions = 0\nmax_messages = 0\nstrict_reads = true\n",
        )
        .unwrap();
        let limits = config.sessions.to_session_limits();
        assert_eq!(limits.max_sessions, None);
        assert_eq!(limits.max_messages_per_session, None);
        assert!(limits.strict_reads);
    }
}
