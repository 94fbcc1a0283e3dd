//! # stacksmith
//!
//! Test harness for deployable infrastructure templates: package and
//! deploy a template as a named stack, poll for readiness inside a
//! wall-clock budget, probe the resulting endpoints over a remote shell
//! or HTTP, read stack outputs, and tear everything down.
//!
//! # Example
//!
//! ```rust,ignore
//! use stacksmith::{HarnessConfig, StackHarness};
//! use stacksmith_backends::CloudFormationBackend;
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let backend = CloudFormationBackend::new(HarnessConfig::from_env()?)?;
//! let harness = StackHarness::new(Box::new(backend));
//!
//! let stack = harness
//!     .deploy(Path::new("template.yaml"), &HashMap::new(), &[])
//!     .await?;
//! harness.await_ready(&stack).await?;
//!
//! let outputs = harness.outputs(&stack).await?;
//! let body = stacksmith::probes::http::probe_get(&outputs["Endpoint"]).await?;
//!
//! harness.teardown(stack).await?;
//! ```

pub mod harness;

pub use harness::{DeployedStack, StackHarness};
pub use stacksmith_backends::{
    CloudFormationBackend, DeploymentBackend, HarnessConfig, StackWaiter, WaitReport,
};
pub use stacksmith_core::{Error, Result};
pub use stacksmith_probes as probes;
