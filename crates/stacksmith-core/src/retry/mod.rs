//! Retry execution engine with policy-based configuration
//!
//! One configurable engine backs every retry site in the harness: probe
//! adapters, backend glue, and tests all go through the same executor
//! instead of carrying their own loops.
//!
//! # Features
//!
//! - Pluggable backoff: fixed delay, exponential, exponential with jitter
//! - Full attempt history captured per session and embedded in the
//!   exhaustion error for post-hoc diagnosis
//! - Predicate seam to stop early on errors retrying cannot fix
//! - Observable sessions via `RetryObserver`, with a built-in
//!   `TracingObserver`
//!
//! # Example
//!
//! ```rust,no_run
//! use stacksmith_core::retry::{retry, RetryError};
//! use stacksmith_core::types::RetryPolicy;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::default();
//!
//!     retry(&policy, || async {
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

mod error;
mod executor;
mod history;
mod observer;
mod strategies;

pub use error::RetryError;
pub use executor::{retry, RetryExecutor, RetryExecutorBuilder};
pub use history::{format_attempts, Attempt};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use strategies::{delay_for, AlwaysRetry, ClosurePredicate, RetryPredicate};

#[cfg(test)]
mod tests;
