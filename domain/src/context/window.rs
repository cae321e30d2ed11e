//! Prompt window composition.
//!
//! [`ContextWindow::build`] picks the part of a session's history that is
//! forwarded to the completion API. The window is always a contiguous suffix
//! of the history: messages are dropped from the front only, and the most
//! recent message is always kept, even when it alone exceeds the character
//! bound.

use crate::context::context_budget::ContextBudget;
use crate::session::entities::Message;

/// The message sequence selected for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    /// Selected messages, oldest first.
    pub messages: Vec<Message>,
    /// How many older messages were left out.
    pub dropped: usize,
    /// Total characters of content in `messages`.
    pub chars: usize,
}

impl ContextWindow {
    /// Select the longest suffix of `history` that fits `budget`.
    pub fn build(history: &[Message], budget: &ContextBudget) -> Self {
        let mut start = history.len();
        let mut chars = 0usize;

        for (idx, message) in history.iter().enumerate().rev() {
            let taken = history.len() - start;
            let size = message.char_count();

            if taken > 0 {
                if budget.max_messages().is_some_and(|max| taken >= max) {
                    break;
                }
                if budget.max_chars().is_some_and(|max| chars + size > max) {
                    break;
                }
            }

            chars += size;
            start = idx;
        }

        Self {
            messages: history[start..].to_vec(),
            dropped: start,
            chars,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}
