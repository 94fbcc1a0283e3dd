//! Shared types: retry policies and wait budgets

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay-growth policy between attempts
    #[serde(default)]
    pub backoff: Backoff,

    /// Base delay between attempts in milliseconds
    #[serde(default = "default_delay")]
    pub delay_ms: u64,

    /// Upper bound on any single inter-attempt delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: Backoff::default(),
            delay_ms: default_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    30
}
fn default_delay() -> u64 {
    10_000
}
fn default_max_delay() -> u64 {
    300_000
}

/// Delay-growth policy applied between successive attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Backoff {
    /// Constant delay between attempts (default)
    #[default]
    Fixed,

    /// `delay * 2^attempt`
    Exponential,

    /// `delay + random() * 2^attempt * delay`
    ExponentialJitter,
}

/// Wall-clock allowance for a multi-phase polling wait
///
/// Each phase asks for `attempts_for_remaining()` polls at `poll_interval`;
/// the time a phase actually consumed is charged back via `charge` before
/// the next phase computes its cap. Ceiling division means the sum of
/// per-phase maximums can exceed the total by at most one interval of
/// slack, and a phase always gets at least one poll at the full interval.
#[derive(Debug, Clone, Copy)]
pub struct WaitBudget {
    total: Duration,
    poll_interval: Duration,
    spent: Duration,
}

impl WaitBudget {
    /// Create a budget with the given total allowance and poll interval
    pub fn new(total: Duration, poll_interval: Duration) -> Self {
        Self {
            total,
            poll_interval,
            spent: Duration::ZERO,
        }
    }

    /// The per-poll interval every phase uses
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Wall-clock time still available
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.spent)
    }

    /// Attempt cap for the next phase: `ceil(remaining / poll_interval)`, minimum 1
    pub fn attempts_for_remaining(&self) -> u32 {
        let interval_ms = self.poll_interval.as_millis().max(1);
        let attempts = self.remaining().as_millis().div_ceil(interval_ms);
        (attempts.max(1)).min(u32::MAX as u128) as u32
    }

    /// Charge wall-clock time actually consumed by a completed phase
    pub fn charge(&mut self, elapsed: Duration) {
        self.spent = self.spent.saturating_add(elapsed);
    }

    /// Whether the allowance has been fully consumed
    pub fn is_exhausted(&self) -> bool {
        self.spent >= self.total
    }
}
