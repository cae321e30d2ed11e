//! Context budget for bounding what is forwarded to the completion API.
//!
//! [`ContextBudget`] approximates a token budget with two optional knobs:
//!
//! - `max_messages`: how many messages of history may be sent
//! - `max_chars`: how many characters of message content may be sent
//!
//! A bound of `None` disables that check. When both are set, the window
//! must satisfy both.

use serde::{Deserialize, Serialize};

/// Budget controlling how much conversation history is sent per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    max_messages: Option<usize>,
    max_chars: Option<usize>,
}

impl ContextBudget {
    /// Create a new budget with explicit values (unchecked).
    pub fn new(max_messages: Option<usize>, max_chars: Option<usize>) -> Self {
        Self {
            max_messages,
            max_chars,
        }
    }

    /// Create a budget, rejecting bounds of zero.
    pub fn try_new(
        max_messages: Option<usize>,
        max_chars: Option<usize>,
    ) -> Result<Self, Vec<String>> {
        let budget = Self::new(max_messages, max_chars);
        let issues = budget.validate();
        if issues.is_empty() {
            Ok(budget)
        } else {
            Err(issues)
        }
    }

    /// Bound by message count only.
    pub fn by_messages(max_messages: usize) -> Self {
        Self::new(Some(max_messages), None)
    }

    /// Bound by character length only.
    pub fn by_chars(max_chars: usize) -> Self {
        Self::new(None, Some(max_chars))
    }

    /// No truncation: the whole history is forwarded.
    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    // ==================== Accessors ====================

    pub fn max_messages(&self) -> Option<usize> {
        self.max_messages
    }

    pub fn max_chars(&self) -> Option<usize> {
        self.max_chars
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_messages.is_none() && self.max_chars.is_none()
    }

    // ==================== Builder Methods ====================

    pub fn with_max_messages(mut self, max: Option<usize>) -> Self {
        self.max_messages = max;
        self
    }

    pub fn with_max_chars(mut self, max: Option<usize>) -> Self {
        self.max_chars = max;
        self
    }

    // ==================== Validation ====================

    /// Validate this budget, returning a list of issues.
    ///
    /// Every configured bound must be >= 1.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_messages == Some(0) {
            issues.push("context_budget: max_messages must be >= 1".to_string());
        }
        if self.max_chars == Some(0) {
            issues.push("context_budget: max_chars must be >= 1".to_string());
        }
        issues
    }
}

impl Default for ContextBudget {
    /// Default: last 20 messages, at most 24 000 characters.
    fn default() -> Self {
        Self::new(Some(20), Some(24_000))
    }
}
