//! Error types for the retry execution engine

use std::error::Error;
use std::fmt;
use std::time::Duration;

use super::history::{format_attempts, Attempt};

/// Errors that can terminate a retry session
///
/// Generic over `E`, the error type of the operation being retried.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All attempts within the session failed
    ///
    /// Carries the full ordered attempt history; the `Display` output
    /// embeds one diagnostic line per attempt so a failure can be
    /// diagnosed post-hoc without reproducing it.
    Exhausted {
        /// Every failed attempt, in order
        history: Vec<Attempt<E>>,
        /// Total duration spent across all attempts
        total_duration: Duration,
    },

    /// A predicate determined the error cannot be fixed by retrying
    NonRetryable(E),
}

impl<E> RetryError<E> {
    /// Create an exhausted error from a session's attempt history
    pub fn exhausted(history: Vec<Attempt<E>>, total_duration: Duration) -> Self {
        RetryError::Exhausted {
            history,
            total_duration,
        }
    }

    /// Create a non-retryable error
    pub fn non_retryable(source: E) -> Self {
        RetryError::NonRetryable(source)
    }

    /// Number of attempts made before the session terminated
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { history, .. } => history.len() as u32,
            RetryError::NonRetryable(_) => 1,
        }
    }

    /// The recorded attempt history, if the session was exhausted
    pub fn history(&self) -> &[Attempt<E>] {
        match self {
            RetryError::Exhausted { history, .. } => history,
            RetryError::NonRetryable(_) => &[],
        }
    }

    /// Check if this error indicates all attempts were exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Check if this error short-circuited on a non-retryable failure
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, RetryError::NonRetryable(_))
    }

    /// The error from the final attempt, consuming this error
    pub fn into_last_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { history, .. } => history.into_iter().last().map(|a| a.error),
            RetryError::NonRetryable(source) => Some(source),
        }
    }

    /// A reference to the error from the final attempt
    pub fn last_error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { history, .. } => history.last().map(|a| &a.error),
            RetryError::NonRetryable(source) => Some(source),
        }
    }
}

impl<E: Error> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                history,
                total_duration,
            } => {
                write!(
                    f,
                    "retry exhausted after {} attempts over {:.2}s:\n{}",
                    history.len(),
                    total_duration.as_secs_f64(),
                    format_attempts(history)
                )
            }
            RetryError::NonRetryable(source) => {
                write!(f, "non-retryable error: {}", source)
            }
        }
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RetryError::Exhausted { history, .. } => {
                history.last().map(|a| &a.error as &(dyn Error + 'static))
            }
            RetryError::NonRetryable(source) => Some(source),
        }
    }
}
