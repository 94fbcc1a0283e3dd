//! Backoff calculation and retry predicates

use crate::types::{Backoff, RetryPolicy};
use rand::Rng;
use std::time::Duration;

/// Calculate the delay before the next retry attempt
///
/// `attempt` is the 1-based attempt number that just failed. Exponential
/// growth is computed from the 0-based index, so the delay after the first
/// failure equals the base delay. All results are capped at
/// `policy.max_delay_ms`.
///
/// # Example
///
/// ```rust
/// use stacksmith_core::retry::delay_for;
/// use stacksmith_core::types::{Backoff, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy {
///     max_attempts: 5,
///     backoff: Backoff::Exponential,
///     delay_ms: 1000,
///     max_delay_ms: 30_000,
/// };
///
/// assert_eq!(delay_for(&policy, 1), Duration::from_millis(1000));
/// assert_eq!(delay_for(&policy, 3), Duration::from_millis(4000));
/// ```
pub fn delay_for(policy: &RetryPolicy, attempt: u32) -> Duration {
    let attempt_index = attempt.saturating_sub(1);

    let delay_ms = match policy.backoff {
        Backoff::Fixed => policy.delay_ms,

        Backoff::Exponential => scaled_delay(policy, attempt_index),

        Backoff::ExponentialJitter => {
            let scaled = scaled_delay(policy, attempt_index);
            let jitter = (rand::rng().random::<f64>() * scaled as f64) as u64;
            policy.delay_ms.saturating_add(jitter)
        }
    };

    Duration::from_millis(delay_ms.min(policy.max_delay_ms))
}

/// `delay * 2^attempt_index`, saturating instead of overflowing
fn scaled_delay(policy: &RetryPolicy, attempt_index: u32) -> u64 {
    // Exponents beyond 63 would overflow any u64 delay anyway
    let factor = 1u64.checked_shl(attempt_index.min(63)).unwrap_or(u64::MAX);
    policy.delay_ms.saturating_mul(factor)
}

/// A predicate that decides whether an error should be retried
///
/// By default every error is retryable; implement this to short-circuit
/// retry sessions on errors another attempt cannot fix.
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    /// Determine whether the given error should be retried
    fn should_retry(&self, error: &E) -> bool;
}

/// A predicate that always retries
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// A predicate that uses a closure to determine retryability
///
/// ```rust
/// use stacksmith_core::retry::{ClosurePredicate, RetryPredicate};
/// use stacksmith_core::Error;
///
/// let predicate = ClosurePredicate::new(|err: &Error| err.is_retryable());
/// assert!(!predicate.should_retry(&Error::tool_missing("aws")));
/// ```
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    /// Create a new closure-based predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}
