//! Retry and deadline wrapper for completion gateways.
//!
//! [`ResilientGateway`] retries transient failures (timeouts, transport
//! errors, 429 and 5xx) with exponential backoff and gives up on permanent
//! ones immediately. The whole call, backoff included, runs under
//! [`RetryPolicy::timeout`]; exceeding it yields [`GatewayError::Timeout`].

use async_trait::async_trait;
use relay_application::{CompletionGateway, GatewayError, RetryPolicy};
use relay_domain::{Message, Model};
use std::sync::Arc;
use tracing::warn;

pub struct ResilientGateway {
    inner: Arc<dyn CompletionGateway>,
    policy: RetryPolicy,
}

impl ResilientGateway {
    pub fn new(inner: Arc<dyn CompletionGateway>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn complete_with_retries(
        &self,
        model: &Model,
        messages: &[Message],
    ) -> Result<String, GatewayError> {
        let attempts = self.policy.max_attempts();
        let mut retry = 0;
        loop {
            match self.inner.complete(model, messages).await {
                Ok(reply) => return Ok(reply),
                Err(e) if !e.is_transient() || retry + 1 >= attempts => return Err(e),
                Err(e) => {
                    let delay = self.policy.backoff_delay(retry);
                    warn!(
                        attempt = retry + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Completion attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }
}

#[async_trait]
impl CompletionGateway for ResilientGateway {
    async fn complete(&self, model: &Model, messages: &[Message]) -> Result<String, GatewayError> {
        match tokio::time::timeout(
            self.policy.timeout,
            self.complete_with_retries(model, messages),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.policy.timeout.as_millis() as u64,
                    "Completion deadline exceeded"
                );
                Err(GatewayError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::Role;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Outcome {
        Reply(&'static str),
        Fail(GatewayError),
        Hang,
    }

    /// Inner gateway that plays back a fixed list of outcomes.
    struct ScriptedGateway {
        outcomes: Mutex<VecDeque<Outcome>>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(outcomes: Vec<Outcome>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionGateway for ScriptedGateway {
        async fn complete(&self, _: &Model, _: &[Message]) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.outcomes.lock().unwrap().pop_front();
            match next {
                Some(Outcome::Reply(text)) => Ok(text.to_string()),
                Some(Outcome::Fail(e)) => Err(e),
                Some(Outcome::Hang) | None => std::future::pending().await,
            }
        }
    }

    fn unavailable() -> GatewayError {
        GatewayError::from_status(503, "unavailable")
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(2)
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(30))
    }

    fn messages() -> Vec<Message> {
        vec![Message::new(Role::User, "Hi", 0)]
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_with_backoff() {
        let inner = ScriptedGateway::new(vec![
            Outcome::Fail(unavailable()),
            Outcome::Fail(GatewayError::ConnectionError("reset".to_string())),
            Outcome::Reply("Hello"),
        ]);
        let gateway = ResilientGateway::new(inner.clone(), policy());

        let start = tokio::time::Instant::now();
        let reply = gateway.complete(&Model::default(), &messages()).await;
        let elapsed = start.elapsed();

        assert_eq!(reply.unwrap(), "Hello");
        assert_eq!(inner.calls(), 3);
        // 100ms before the first retry, 200ms before the second.
        assert!(elapsed >= Duration::from_millis(300), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(400), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_last_error() {
        let inner = ScriptedGateway::new(vec![
            Outcome::Fail(unavailable()),
            Outcome::Fail(unavailable()),
            Outcome::Fail(GatewayError::from_status(429, "rate limited")),
        ]);
        let gateway = ResilientGateway::new(inner.clone(), policy());

        let err = gateway
            .complete(&Model::default(), &messages())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::from_status(429, "rate limited"));
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let inner = ScriptedGateway::new(vec![
            Outcome::Fail(GatewayError::from_status(400, "bad request")),
            Outcome::Reply("unreachable"),
        ]);
        let gateway = ResilientGateway::new(inner.clone(), policy());

        let err = gateway
            .complete(&Model::default(), &messages())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 400, .. }));
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_call_hits_deadline() {
        let inner = ScriptedGateway::new(vec![Outcome::Hang]);
        let gateway = ResilientGateway::new(
            inner.clone(),
            policy().with_timeout(Duration::from_secs(5)),
        );

        let start = tokio::time::Instant::now();
        let err = gateway
            .complete(&Model::default(), &messages())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_includes_backoff() {
        let inner = ScriptedGateway::new(vec![
            Outcome::Fail(unavailable()),
            Outcome::Reply("too late"),
        ]);
        let gateway = ResilientGateway::new(
            inner.clone(),
            policy()
                .with_base_delay(Duration::from_secs(5))
                .with_max_delay(Duration::from_secs(5))
                .with_timeout(Duration::from_secs(1)),
        );

        let err = gateway
            .complete(&Model::default(), &messages())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_retry_policy_makes_one_attempt() {
        let inner = ScriptedGateway::new(vec![Outcome::Fail(unavailable()), Outcome::Reply("x")]);
        let gateway = ResilientGateway::new(inner.clone(), RetryPolicy::no_retry());

        assert!(gateway.complete(&Model::default(), &messages()).await.is_err());
        assert_eq!(inner.calls(), 1);
    }
}
