//! # stacksmith-backends
//!
//! Deployment backend adapters for the stacksmith harness:
//! - The `DeploymentBackend` trait consumed by the harness and waiter
//! - A CloudFormation implementation shelling out to the `aws` CLI
//! - Bounded two-phase readiness waits with a wall-clock budget
//! - Harness configuration, scoped packaged artifacts, and identifier
//!   generation

pub mod artifact;
pub mod cloudformation;
pub mod config;
pub mod naming;
pub mod traits;
pub mod wait;

pub use artifact::PackagedTemplate;
pub use cloudformation::CloudFormationBackend;
pub use config::HarnessConfig;
pub use traits::DeploymentBackend;
pub use wait::{StackWaiter, WaitReport};
