//! Relay Chat use case.
//!
//! Records an inbound user message, forwards the budgeted conversation
//! window to the completion gateway, and records the reply.
//!
//! The session lock is held from the user append until the reply is
//! appended, so one session only ever has a single completion in flight and
//! its history stays in arrival order. If the caller drops the returned
//! future (client disconnect), the lock is released and no reply is
//! recorded; the user message stays.

use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use crate::session_store::{SessionStore, StoreError};
use relay_domain::util::preview;
use relay_domain::{ContextBudget, ContextWindow, DomainError, Message, Model, SessionId};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Caller-facing error category of a failed relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Timeout,
    UpstreamError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Timeout => "timeout",
            ErrorKind::UpstreamError => "upstream_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while relaying a chat message.
#[derive(Error, Debug)]
pub enum RelayChatError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Completion timed out")]
    Timeout,

    #[error("{0}")]
    Upstream(GatewayError),
}

impl RelayChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayChatError::InvalidInput(_) => ErrorKind::InvalidInput,
            RelayChatError::NotFound(_) => ErrorKind::NotFound,
            RelayChatError::Timeout => ErrorKind::Timeout,
            RelayChatError::Upstream(_) => ErrorKind::UpstreamError,
        }
    }
}

impl From<GatewayError> for RelayChatError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout => RelayChatError::Timeout,
            other => RelayChatError::Upstream(other),
        }
    }
}

impl From<StoreError> for RelayChatError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RelayChatError::NotFound(id),
        }
    }
}

impl From<DomainError> for RelayChatError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => RelayChatError::InvalidInput(msg),
        }
    }
}

/// Input for the [`RelayChatUseCase`].
#[derive(Debug, Clone)]
pub struct RelayChatInput {
    /// The user's message.
    pub message: String,
    /// Session to continue; a new one is started when absent.
    pub session_id: Option<String>,
}

impl RelayChatInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Output of a successful relay.
#[derive(Debug, Clone)]
pub struct RelayChatOutput {
    pub session_id: SessionId,
    pub reply: String,
    /// Messages forwarded to the completion API.
    pub context_messages: usize,
    /// Older messages left out by the context budget.
    pub dropped_messages: usize,
}

/// Use case for relaying one chat message.
#[derive(Clone)]
pub struct RelayChatUseCase {
    store: Arc<SessionStore>,
    gateway: Arc<dyn CompletionGateway>,
    model: Model,
    budget: ContextBudget,
}

impl RelayChatUseCase {
    pub fn new(store: Arc<SessionStore>, gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            store,
            gateway,
            model: Model::default(),
            budget: ContextBudget::default(),
        }
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Relay one message and record the reply.
    pub async fn execute(&self, input: RelayChatInput) -> Result<RelayChatOutput, RelayChatError> {
        if input.message.trim().is_empty() {
            return Err(RelayChatError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }
        let session_id = match input.session_id {
            Some(id) => SessionId::new(id)?,
            None => SessionId::generate(),
        };

        let mut session = self.store.lock(&session_id).await;
        let user = session.add_user_message(input.message);
        info!(
            session = %session_id,
            seq = user.seq,
            "Relaying message: {}",
            preview(&user.content, 80)
        );

        let window = ContextWindow::build(session.messages(), &self.budget);
        debug!(
            session = %session_id,
            messages = window.len(),
            dropped = window.dropped,
            chars = window.chars,
            "Composed context window"
        );

        let reply = match self.gateway.complete(&self.model, &window.messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session = %session_id, model = %self.model, "Completion failed: {}", e);
                return Err(e.into());
            }
        };

        let assistant = session.add_assistant_message(reply);
        debug!(session = %session_id, seq = assistant.seq, "Recorded reply");

        Ok(RelayChatOutput {
            session_id,
            reply: assistant.content,
            context_messages: window.len(),
            dropped_messages: window.dropped,
        })
    }

    /// Ordered history of a session, honoring the store's read mode.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, RelayChatError> {
        let session_id = SessionId::new(session_id)?;
        Ok(self.store.history(&session_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionLimits;
    use async_trait::async_trait;
    use relay_domain::Role;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// What the scripted gateway does for one call
    enum Scripted {
        Reply(String),
        Fail(GatewayError),
        DelayedReply(Duration, String),
        Hang,
    }

    /// Mock gateway that plays scripted outcomes in order and records inputs
    struct ScriptedGateway {
        script: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn replying(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Scripted::Reply(r.to_string())).collect())
        }

        fn calls(&self) -> Vec<Vec<Message>> {
            self.calls.lock().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionGateway for ScriptedGateway {
        async fn complete(
            &self,
            _model: &Model,
            messages: &[Message],
        ) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Scripted::Reply(text)) => Ok(text),
                Some(Scripted::Fail(err)) => Err(err),
                Some(Scripted::DelayedReply(delay, text)) => {
                    tokio::time::sleep(delay).await;
                    Ok(text)
                }
                Some(Scripted::Hang) => std::future::pending().await,
                None => Ok("(no more responses)".to_string()),
            }
        }
    }

    fn use_case(gateway: Arc<ScriptedGateway>) -> RelayChatUseCase {
        RelayChatUseCase::new(Arc::new(SessionStore::default()), gateway)
    }

    fn roles_and_contents(history: &[Message]) -> Vec<(Role, String)> {
        history.iter().map(|m| (m.role, m.content.clone())).collect()
    }

    #[tokio::test]
    async fn reply_is_recorded_after_user_message() {
        let gateway = Arc::new(ScriptedGateway::replying(&["Hello"]));
        let uc = use_case(gateway.clone());

        let out = uc
            .execute(RelayChatInput::new("Hi").with_session_id("s1"))
            .await
            .unwrap();
        assert_eq!(out.reply, "Hello");
        assert_eq!(out.session_id.as_str(), "s1");

        let history = uc.history("s1").await.unwrap();
        assert_eq!(
            roles_and_contents(&history),
            vec![
                (Role::User, "Hi".to_string()),
                (Role::Assistant, "Hello".to_string())
            ]
        );
        assert_eq!(gateway.calls()[0].len(), 1);
    }

    #[tokio::test]
    async fn timeout_keeps_user_message_and_adds_no_reply() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Fail(GatewayError::Timeout)]));
        let uc = use_case(gateway);

        let err = uc
            .execute(RelayChatInput::new("Hi").with_session_id("s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayChatError::Timeout));
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let history = uc.history("s1").await.unwrap();
        assert_eq!(roles_and_contents(&history), vec![(Role::User, "Hi".to_string())]);
    }

    #[tokio::test]
    async fn upstream_error_surfaces_without_reply() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Fail(
            GatewayError::from_status(500, "boom"),
        )]));
        let uc = use_case(gateway);

        let err = uc
            .execute(RelayChatInput::new("Hi").with_session_id("s1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert_eq!(uc.history("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_touching_the_store() {
        let gateway = Arc::new(ScriptedGateway::replying(&["unused"]));
        let uc = use_case(gateway.clone());

        for message in ["", "   ", "\n\t"] {
            let err = uc
                .execute(RelayChatInput::new(message).with_session_id("s1"))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert!(uc.store().is_empty());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_session_id_is_invalid_input() {
        let gateway = Arc::new(ScriptedGateway::replying(&["unused"]));
        let uc = use_case(gateway);

        let err = uc
            .execute(RelayChatInput::new("Hi").with_session_id("  "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(uc.store().is_empty());
    }

    #[tokio::test]
    async fn generated_session_can_be_continued() {
        let gateway = Arc::new(ScriptedGateway::replying(&["first", "second"]));
        let uc = use_case(gateway.clone());

        let first = uc.execute(RelayChatInput::new("one")).await.unwrap();
        let second = uc
            .execute(RelayChatInput::new("two").with_session_id(first.session_id.as_str()))
            .await
            .unwrap();

        assert_eq!(first.session_id, second.session_id);
        let calls = gateway.calls();
        let contents: Vec<_> = calls[1].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "first", "two"]);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let gateway = Arc::new(ScriptedGateway::replying(&["a-reply", "b-reply"]));
        let uc = use_case(gateway.clone());

        uc.execute(RelayChatInput::new("to a").with_session_id("a"))
            .await
            .unwrap();
        uc.execute(RelayChatInput::new("to b").with_session_id("b"))
            .await
            .unwrap();

        let second_call = &gateway.calls()[1];
        assert_eq!(second_call.len(), 1);
        assert_eq!(second_call[0].content, "to b");
    }

    #[tokio::test]
    async fn budget_limits_forwarded_context() {
        let gateway = Arc::new(ScriptedGateway::replying(&["r1", "r2", "r3"]));
        let uc = use_case(gateway.clone()).with_budget(ContextBudget::by_messages(2));

        for message in ["m1", "m2", "m3"] {
            uc.execute(RelayChatInput::new(message).with_session_id("s"))
                .await
                .unwrap();
        }

        let last_call = gateway.calls().pop().unwrap();
        let contents: Vec<_> = last_call.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["r2", "m3"]);
        // Full history is still stored.
        assert_eq!(uc.history("s").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn aborted_request_discards_reply() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Hang]));
        let uc = use_case(gateway.clone());

        let task = {
            let uc = uc.clone();
            tokio::spawn(async move {
                uc.execute(RelayChatInput::new("Hi").with_session_id("s1"))
                    .await
            })
        };
        while gateway.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let history = uc.history("s1").await.unwrap();
        assert_eq!(roles_and_contents(&history), vec![(Role::User, "Hi".to_string())]);

        // The session lock was released with the dropped request.
        let out = uc
            .execute(RelayChatInput::new("again").with_session_id("s1"))
            .await
            .unwrap();
        assert_eq!(out.reply, "(no more responses)");
    }

    #[tokio::test(start_paused = true)]
    async fn same_session_requests_complete_in_order() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::DelayedReply(Duration::from_millis(50), "first".to_string()),
            Scripted::DelayedReply(Duration::from_millis(10), "second".to_string()),
        ]));
        let uc = use_case(gateway.clone());

        let (a, b) = tokio::join!(
            uc.execute(RelayChatInput::new("q1").with_session_id("s")),
            uc.execute(RelayChatInput::new("q2").with_session_id("s")),
        );
        assert_eq!(a.unwrap().reply, "first");
        assert_eq!(b.unwrap().reply, "second");

        let history = uc.history("s").await.unwrap();
        assert_eq!(
            roles_and_contents(&history),
            vec![
                (Role::User, "q1".to_string()),
                (Role::Assistant, "first".to_string()),
                (Role::User, "q2".to_string()),
                (Role::Assistant, "second".to_string()),
            ]
        );
        // The second request saw the first exchange.
        assert_eq!(gateway.calls()[1].len(), 3);
    }

    #[tokio::test]
    async fn slow_session_does_not_block_other_sessions() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Hang,
            Scripted::Reply("fast".to_string()),
        ]));
        let uc = use_case(gateway.clone());

        let slow = {
            let uc = uc.clone();
            tokio::spawn(async move {
                uc.execute(RelayChatInput::new("slow").with_session_id("a"))
                    .await
            })
        };
        while gateway.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        let fast = tokio::time::timeout(
            Duration::from_secs(1),
            uc.execute(RelayChatInput::new("quick").with_session_id("b")),
        )
        .await
        .expect("other session must not wait")
        .unwrap();
        assert_eq!(fast.reply, "fast");

        slow.abort();
    }

    #[tokio::test]
    async fn strict_history_of_unknown_session_is_not_found() {
        let store = Arc::new(SessionStore::new(SessionLimits::default().with_strict_reads(true)));
        let uc = RelayChatUseCase::new(store, Arc::new(ScriptedGateway::replying(&[])));

        let err = uc.history("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
