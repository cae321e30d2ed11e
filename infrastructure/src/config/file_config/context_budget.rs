//! Context budget configuration from TOML (`[context_budget]` section)

use relay_domain::{ConfigIssue, ConfigIssueCode, ContextBudget};
use serde::{Deserialize, Serialize};

/// Context budget configuration from TOML.
///
/// Controls how much session history is forwarded per completion request.
/// A value of `0` disables that bound.
///
/// # Example
///
/// ```toml
/// [context_budget]
/// max_messages = 12
/// max_chars = 16000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextBudgetConfig {
    /// Maximum messages forwarded (0 = no bound).
    pub max_messages: usize,
    /// Maximum characters of content forwarded (0 = no bound).
    pub max_chars: usize,
}

impl Default for FileContextBudgetConfig {
    fn default() -> Self {
        let budget = ContextBudget::default();
        Self {
            max_messages: budget.max_messages().unwrap_or(0),
            max_chars: budget.max_chars().unwrap_or(0),
        }
    }
}

impl FileContextBudgetConfig {
    /// Convert to domain `ContextBudget`, returning validation issues.
    pub fn to_context_budget(&self) -> (ContextBudget, Vec<ConfigIssue>) {
        let budget = ContextBudget::new(
            Some(self.max_messages).filter(|&n| n > 0),
            Some(self.max_chars).filter(|&n| n > 0),
        );
        let mut issues = Vec::new();
        if budget.is_unlimited() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "context_budget".to_string(),
                },
                "context_budget: both bounds are 0, the full history is sent with every request",
            ));
        }
        (budget, issues)
    }
}
