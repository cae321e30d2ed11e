//! In-process session store.
//!
//! [`SessionStore`] maps session ids to their conversation history. Each
//! session sits behind its own async mutex, so appends to one session are
//! serialized while other sessions proceed independently. The index itself
//! is a short synchronous critical section that is never held across an
//! `.await`.
//!
//! When [`SessionLimits::max_sessions`] is set, the least recently used idle
//! session is evicted to make room for a new one. A session that is locked or
//! awaited is never evicted; if every session is busy the index grows past
//! the bound until some become idle again.

use crate::config::SessionLimits;
use lru::LruCache;
use relay_domain::{Message, Role, Session, SessionId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Exclusive access to one session, held across build + complete + append.
pub type SessionGuard = OwnedMutexGuard<Session>;

type SessionHandle = Arc<AsyncMutex<Session>>;

/// Errors returned by [`SessionStore`] reads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
}

/// Shared mapping from session id to ordered message history.
pub struct SessionStore {
    sessions: Mutex<LruCache<SessionId, SessionHandle>>,
    limits: SessionLimits,
}

impl SessionStore {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            sessions: Mutex::new(LruCache::unbounded()),
            limits,
        }
    }

    pub fn limits(&self) -> &SessionLimits {
        &self.limits
    }

    /// Lock a session for exclusive use, creating it if it does not exist.
    pub async fn lock(&self, id: &SessionId) -> SessionGuard {
        self.get_or_create(id).lock_owned().await
    }

    /// Append one message to a session, creating the session if needed.
    pub async fn append(&self, id: &SessionId, role: Role, content: impl Into<String>) -> Message {
        let mut session = self.lock(id).await;
        session.append(role, content)
    }

    /// Ordered history of a session.
    ///
    /// An unknown session is an error under strict reads and an empty
    /// history otherwise. Reading never creates a session.
    pub async fn history(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        let handle = self.index().get(id).cloned();
        match handle {
            Some(handle) => Ok(handle.lock().await.messages().to_vec()),
            None if self.limits.strict_reads => Err(StoreError::NotFound(id.clone())),
            None => Ok(Vec::new()),
        }
    }

    /// Whether a session exists, without refreshing its LRU position.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.index().contains(id)
    }

    pub fn len(&self) -> usize {
        self.index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ==================== Internal ====================

    fn index(&self) -> MutexGuard<'_, LruCache<SessionId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_create(&self, id: &SessionId) -> SessionHandle {
        let mut sessions = self.index();
        if let Some(handle) = sessions.get(id) {
            return handle.clone();
        }

        let handle = Arc::new(AsyncMutex::new(Session::with_max_messages(
            id.clone(),
            self.limits.max_messages_per_session,
        )));
        if let Some(max) = self.limits.max_sessions.filter(|&n| n > 0) {
            Self::evict_idle(&mut sessions, max);
        }
        sessions.put(id.clone(), handle.clone());
        debug!(session = %id, live = sessions.len(), "Created session");
        handle
    }

    /// Evict idle sessions, least recently used first, until there is room
    /// for one more below `max`. A handle referenced only by the index is
    /// idle: lock holders and waiters each keep their own clone.
    fn evict_idle(sessions: &mut LruCache<SessionId, SessionHandle>, max: usize) {
        while sessions.len() >= max {
            let idle = sessions
                .iter()
                .rev()
                .find(|(_, handle)| Arc::strong_count(handle) == 1)
                .map(|(id, _)| id.clone());
            match idle {
                Some(id) => {
                    sessions.pop(&id);
                    info!(session = %id, "Evicted least recently used session");
                }
                None => {
                    warn!(
                        live = sessions.len(),
                        max, "All sessions busy, exceeding session bound"
                    );
                    break;
                }
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionLimits::default())
    }
}
