//! # stacksmith-core
//!
//! Core library for the stacksmith test harness providing:
//! - Retry execution engine with policy-based configuration
//! - Wall-clock wait budgets for multi-phase polling
//! - Shared error taxonomy for harness operations

pub mod error;
pub mod retry;
pub mod types;

pub use error::{Error, Result};
