//! Retry execution engine

use std::error::Error;
use std::future::Future;
use std::time::Instant;

use crate::types::RetryPolicy;

use super::error::RetryError;
use super::history::Attempt;
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::{delay_for, AlwaysRetry, RetryPredicate};

/// Execute an async operation with retry logic based on a policy
///
/// Convenience entry point for simple sessions; use `RetryExecutorBuilder`
/// when a predicate or observer is needed.
///
/// # Example
///
/// ```rust,no_run
/// use stacksmith_core::retry::retry;
/// use stacksmith_core::types::RetryPolicy;
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///
///     let result = retry(&policy, || async {
///         Ok::<_, std::io::Error>("success")
///     }).await;
/// }
/// ```
pub async fn retry<F, Fut, T, E>(policy: &RetryPolicy, op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + Send + 'static,
{
    RetryExecutorBuilder::new()
        .with_policy(policy.clone())
        .build()
        .execute(op)
        .await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use stacksmith_core::retry::{RetryExecutorBuilder, TracingObserver};
/// use stacksmith_core::types::RetryPolicy;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("http-probe"))
///     .build();
/// ```
pub struct RetryExecutorBuilder<P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl Default for RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            predicate: AlwaysRetry,
            observer: NoOpObserver,
        }
    }
}

impl<P, O> RetryExecutorBuilder<P, O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the predicate deciding which errors are retried
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutorBuilder<P2, O> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate,
            observer: self.observer,
        }
    }

    /// Set the observer receiving session event callbacks
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<P, O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer,
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<P, O> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
        }
    }
}

/// A retry executor with configurable policy, predicate, and observer
///
/// Each `execute` call is an independent session owning its own attempt
/// history; attempts run strictly sequentially, never concurrently.
pub struct RetryExecutor<P, O> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl<P, O> RetryExecutor<P, O>
where
    O: RetryObserver,
{
    /// Execute an operation with retry logic
    ///
    /// Every failing attempt is captured into the session history and
    /// never rethrown mid-loop. Success returns immediately and discards
    /// the history; exhaustion returns `RetryError::Exhausted` carrying
    /// every recorded attempt. No delay is taken after the final failed
    /// attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + Send + 'static,
        P: RetryPredicate<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut history: Vec<Attempt<E>> = Vec::new();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(result);
                }
                Err(err) => {
                    if !self.predicate.should_retry(&err) {
                        self.observer.on_non_retryable(attempt, &err);
                        return Err(RetryError::non_retryable(err));
                    }

                    if attempt >= max_attempts {
                        self.observer.on_exhausted(attempt, &err);
                        history.push(Attempt::new(attempt, err));
                        return Err(RetryError::exhausted(history, start.elapsed()));
                    }

                    let delay = delay_for(&self.policy, attempt);
                    self.observer.on_attempt_failed(attempt, &err, delay);
                    history.push(Attempt::new(attempt, err));

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::observer::StatsObserver;
    use crate::retry::strategies::ClosurePredicate;
    use crate::types::Backoff;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn test_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Backoff::Fixed,
            delay_ms: 10,
            max_delay_ms: 100,
        }
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, RetryError<io::Error>> = RetryExecutorBuilder::new()
            .with_policy(test_policy())
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Ok("success") })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.successes(), 1);
        assert_eq!(observer.failures(), 0);
    }

    #[tokio::test]
    async fn test_success_after_retry_discards_history() {
        let observer = Arc::new(StatsObserver::new());
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<&str, RetryError<io::Error>> = RetryExecutorBuilder::new()
            .with_policy(test_policy())
            .with_observer(observer.clone())
            .build()
            .execute(|| {
                let attempts = attempts_clone.clone();
                async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt < 3 {
                        Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(observer.attempt_starts(), 3);
        assert_eq!(observer.failures(), 2);
        assert_eq!(observer.successes(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_records_every_attempt() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, RetryError<io::Error>> = RetryExecutorBuilder::new()
            .with_policy(test_policy())
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Err(io::Error::other("always fails")) })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.history().len(), 3);
        assert_eq!(observer.attempt_starts(), 3);
        // Only the two non-final failures were retried
        assert_eq!(observer.failures(), 2);
        assert_eq!(observer.exhaustions(), 1);
    }

    #[tokio::test]
    async fn test_attempt_indices_and_timestamps_increase() {
        let result: Result<&str, RetryError<io::Error>> = retry(&test_policy(), || async {
            Err(io::Error::other("boom"))
        })
        .await;

        let err = result.unwrap_err();
        let history = err.history();
        assert_eq!(
            history.iter().map(|a| a.attempt).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(history.windows(2).all(|pair| pair[0].at < pair[1].at));
    }

    #[tokio::test]
    async fn test_non_retryable_short_circuits() {
        let observer = Arc::new(StatsObserver::new());
        let predicate =
            ClosurePredicate::new(|err: &io::Error| err.kind() != io::ErrorKind::NotFound);

        let result: Result<&str, RetryError<io::Error>> = RetryExecutorBuilder::new()
            .with_policy(test_policy())
            .with_predicate(predicate)
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Err(io::Error::new(io::ErrorKind::NotFound, "not found")) })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_non_retryable());
        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.non_retryables(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_boundary() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..test_policy()
        };
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, RetryError<io::Error>> = RetryExecutorBuilder::new()
            .with_policy(policy)
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Err(io::Error::other("error")) })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.history().len(), 1);
        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.failures(), 0);
        assert_eq!(observer.exhaustions(), 1);
    }

    #[tokio::test]
    async fn test_zero_max_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..test_policy()
        };

        let result: Result<&str, RetryError<io::Error>> =
            retry(&policy, || async { Err(io::Error::other("error")) }).await;

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 1);
    }
}
