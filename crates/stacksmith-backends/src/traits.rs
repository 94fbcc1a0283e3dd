//! Deployment backend trait definitions

use crate::artifact::PackagedTemplate;
use async_trait::async_trait;
use stacksmith_core::Result;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Trait for deployment backends
///
/// The harness drives every stack operation through this interface; the
/// wait primitives take their poll interval and attempt cap from the
/// caller so the bounded waiter can split one wall-clock budget across
/// sequential phases.
///
/// # Example
///
/// ```ignore
/// use stacksmith_backends::{CloudFormationBackend, HarnessConfig};
///
/// let backend = CloudFormationBackend::new(HarnessConfig::new("artifact-bucket"))?;
/// let artifact = backend.package(Path::new("template.yaml")).await?;
/// backend.create_or_update(artifact.path(), "my-stack", &params, &caps).await?;
/// ```
#[async_trait]
pub trait DeploymentBackend: Send + Sync {
    /// Get the backend name (e.g. "cloudformation")
    fn name(&self) -> &'static str;

    /// Upload local template references and produce a packaged template
    ///
    /// The returned artifact is scoped: its file is removed when dropped,
    /// on every exit path.
    async fn package(&self, template: &Path) -> Result<PackagedTemplate>;

    /// Deploy a template as `stack_id`, creating or updating in place
    ///
    /// Returns the backend's textual deploy log.
    async fn create_or_update(
        &self,
        template: &Path,
        stack_id: &str,
        parameters: &HashMap<String, String>,
        capabilities: &[String],
    ) -> Result<String>;

    /// Request deletion of the stack
    async fn delete(&self, stack_id: &str) -> Result<String>;

    /// Outputs of the single stack named `stack_id`
    ///
    /// Fails with `UnexpectedStackCount` when zero or more than one stack
    /// matches the identifier.
    async fn describe_outputs(&self, stack_id: &str) -> Result<HashMap<String, String>>;

    /// Create a credential key pair, returning the private key material
    async fn create_key_pair(&self, name: &str) -> Result<String>;

    /// Delete a credential key pair
    async fn delete_key_pair(&self, name: &str) -> Result<()>;

    /// Poll until the stack exists, or `WaitTimeout` after `max_attempts`
    async fn wait_for_existence(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()>;

    /// Poll until the stack reports a ready status
    async fn wait_for_ready(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()>;

    /// Poll until the stack is gone
    async fn wait_for_deleted(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()>;
}
