//! Bounded two-phase stack readiness waits
//!
//! The waiter never retries on its own: it hands the backend's wait
//! primitives an interval and an attempt cap derived from one shared
//! wall-clock budget, charging each phase's actual duration against the
//! budget before the next phase is sized.

use crate::traits::DeploymentBackend;
use stacksmith_core::types::WaitBudget;
use stacksmith_core::Result;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default wall-clock budget for a readiness wait
pub const DEFAULT_WAIT_BUDGET: Duration = Duration::from_secs(45 * 60);

/// Default interval between polls of the backend
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(45);

/// Textual record of a completed readiness wait
#[derive(Debug, Clone)]
pub struct WaitReport {
    /// The stack that was awaited
    pub stack: String,
    /// Wall-clock time until the stack existed
    pub existed_after: Duration,
    /// Further wall-clock time until the stack was ready
    pub ready_after: Duration,
}

impl fmt::Display for WaitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stack {} existed after {:.0?}, ready after a further {:.0?}",
            self.stack, self.existed_after, self.ready_after
        )
    }
}

/// Polls a stack through existence and readiness inside one budget
#[derive(Debug, Clone, Copy)]
pub struct StackWaiter {
    total: Duration,
    poll_interval: Duration,
}

impl Default for StackWaiter {
    fn default() -> Self {
        Self::new()
    }
}

impl StackWaiter {
    /// Create a waiter with the default 45-minute budget and 45-second polls
    pub fn new() -> Self {
        Self {
            total: DEFAULT_WAIT_BUDGET,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Create a waiter with a custom budget and poll interval
    pub fn with_budget(total: Duration, poll_interval: Duration) -> Self {
        Self {
            total,
            poll_interval,
        }
    }

    /// Await existence, then readiness
    ///
    /// The transition to the ready phase happens only on confirmed
    /// existence; an existence timeout is terminal and surfaces the
    /// backend's `WaitTimeout` unchanged.
    pub async fn await_ready(
        &self,
        backend: &dyn DeploymentBackend,
        stack_id: &str,
    ) -> Result<WaitReport> {
        let mut budget = WaitBudget::new(self.total, self.poll_interval);

        debug!(
            stack = stack_id,
            attempts = budget.attempts_for_remaining(),
            "awaiting stack existence"
        );
        let phase_start = Instant::now();
        backend
            .wait_for_existence(stack_id, budget.poll_interval(), budget.attempts_for_remaining())
            .await?;
        let existed_after = phase_start.elapsed();
        budget.charge(existed_after);

        debug!(
            stack = stack_id,
            attempts = budget.attempts_for_remaining(),
            "awaiting stack readiness"
        );
        let phase_start = Instant::now();
        backend
            .wait_for_ready(stack_id, budget.poll_interval(), budget.attempts_for_remaining())
            .await?;
        let ready_after = phase_start.elapsed();

        let report = WaitReport {
            stack: stack_id.to_string(),
            existed_after,
            ready_after,
        };
        info!(stack = stack_id, report = %report, "stack ready");
        Ok(report)
    }

    /// Await deletion, with the full budget as a single phase
    pub async fn await_deleted(
        &self,
        backend: &dyn DeploymentBackend,
        stack_id: &str,
    ) -> Result<()> {
        let budget = WaitBudget::new(self.total, self.poll_interval);
        backend
            .wait_for_deleted(stack_id, budget.poll_interval(), budget.attempts_for_remaining())
            .await
    }
}
