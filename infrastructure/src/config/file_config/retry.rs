//! Retry configuration from TOML (`[retry]` section)

use relay_application::RetryPolicy;
use relay_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on configured retries.
const MAX_RETRIES_LIMIT: usize = 10;

/// Retry and deadline settings for completion calls.
///
/// # Example
///
/// ```toml
/// [retry]
/// max_retries = 3
/// base_delay_ms = 250
/// max_delay_ms = 4000
/// timeout_secs = 45
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Deadline for one completion call, retries and backoff included.
    pub timeout_secs: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

impl FileRetryConfig {
    /// Convert to [`RetryPolicy`], clamping invalid values and reporting them.
    pub fn to_retry_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let defaults = RetryPolicy::default();

        let max_retries = if self.max_retries > MAX_RETRIES_LIMIT {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "retry.max_retries".to_string(),
                },
                format!(
                    "retry.max_retries ({}) exceeds {MAX_RETRIES_LIMIT}, clamping",
                    self.max_retries
                ),
            ));
            MAX_RETRIES_LIMIT
        } else {
            self.max_retries
        };

        let max_delay_ms = if self.max_delay_ms < self.base_delay_ms {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "retry.max_delay_ms".to_string(),
                },
                format!(
                    "retry.max_delay_ms ({}) must be >= base_delay_ms ({}), using base_delay_ms",
                    self.max_delay_ms, self.base_delay_ms
                ),
            ));
            self.base_delay_ms
        } else {
            self.max_delay_ms
        };

        let timeout = if self.timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "retry.timeout_secs".to_string(),
                },
                format!(
                    "retry.timeout_secs must be >= 1, falling back to {}",
                    defaults.timeout.as_secs()
                ),
            ));
            defaults.timeout
        } else {
            Duration::from_secs(self.timeout_secs)
        };

        let policy = RetryPolicy::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(max_delay_ms))
            .with_timeout(timeout);
        (policy, issues)
    }
}
