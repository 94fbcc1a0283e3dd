//! Attempt history capture and diagnostic formatting

use chrono::{DateTime, SecondsFormat, Utc};
use std::error::Error;

/// One failed attempt within a retry session
///
/// Records are immutable: the captured error is stored unmodified and the
/// attempt metadata lives alongside it.
#[derive(Debug)]
pub struct Attempt<E> {
    /// 1-based attempt number
    pub attempt: u32,
    /// When the failure was observed
    pub at: DateTime<Utc>,
    /// The captured error
    pub error: E,
}

impl<E> Attempt<E> {
    /// Record a failure observed just now
    pub fn new(attempt: u32, error: E) -> Self {
        Self {
            attempt,
            at: Utc::now(),
            error,
        }
    }
}

/// Render an attempt history as one diagnostic line per attempt
///
/// Each line carries the 1-based index, an ISO-8601 timestamp, and the
/// error with its `source()` chain appended. Pure formatting: calling it
/// twice on the same records yields identical output.
pub fn format_attempts<E: Error>(attempts: &[Attempt<E>]) -> String {
    attempts
        .iter()
        .map(|record| {
            let mut line = format!(
                "attempt {} at {}: {}",
                record.attempt,
                record.at.to_rfc3339_opts(SecondsFormat::Millis, true),
                record.error
            );
            let mut cause = record.error.source();
            while let Some(err) = cause {
                line.push_str(&format!(": caused by: {}", err));
                cause = err.source();
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
