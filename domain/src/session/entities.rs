//! Session domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a conversation session (Value Object)
///
/// Any non-blank string is accepted; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "session_id must not be blank".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fresh random id (UUID v4) for a new session.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role name as sent to chat completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation (Entity)
///
/// `seq` is the message's position within its session. It is assigned by
/// [`Session::append`] and is never reused, even after older messages are
/// dropped by the per-session bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub seq: u64,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, seq: u64) -> Self {
        Self {
            role,
            content: content.into(),
            seq,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Length of the content in characters, used as a token approximation.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// A conversation thread (Entity)
///
/// Holds the ordered history of one session. When `max_messages` is set,
/// appends beyond the bound drop the oldest messages first.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    next_seq: u64,
    max_messages: Option<usize>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            next_seq: 0,
            max_messages: None,
        }
    }

    /// Create a session whose stored history never exceeds `max_messages`.
    pub fn with_max_messages(id: SessionId, max_messages: Option<usize>) -> Self {
        Self {
            max_messages: max_messages.map(|m| m.max(1)),
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages ever appended, including dropped ones.
    pub fn total_appended(&self) -> u64 {
        self.next_seq
    }

    /// Append a message, assigning the next sequence position.
    ///
    /// Returns a copy of the stored message.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Message {
        let message = Message::new(role, content, self.next_seq);
        self.next_seq += 1;
        self.messages.push(message.clone());

        if let Some(max) = self.max_messages {
            let excess = self.messages.len().saturating_sub(max);
            if excess > 0 {
                self.messages.drain(..excess);
            }
        }

        message
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) -> Message {
        self.append(Role::User, content)
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) -> Message {
        self.append(Role::Assistant, content)
    }
}
