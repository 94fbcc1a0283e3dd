//! Stack lifecycle orchestration
//!
//! A harness session owns its backend and waiter; independent sessions
//! share no mutable state and can run concurrently. There is no built-in
//! cancellation: callers needing one wrap the session in their own
//! timeout.

use anyhow::{Context, Result};
use stacksmith_backends::naming::generate_id;
use stacksmith_backends::traits::DeploymentBackend;
use stacksmith_backends::wait::{StackWaiter, WaitReport};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// A stack deployed by a harness session
#[derive(Debug, Clone)]
pub struct DeployedStack {
    /// Generated stack identifier
    pub stack_id: String,
    /// Key pair provisioned for this session, if any
    pub key_pair: Option<String>,
}

/// Drives a template through deploy, await, outputs, and teardown
pub struct StackHarness {
    backend: Box<dyn DeploymentBackend>,
    waiter: StackWaiter,
}

impl StackHarness {
    /// Create a harness with the default 45-minute wait budget
    pub fn new(backend: Box<dyn DeploymentBackend>) -> Self {
        Self {
            backend,
            waiter: StackWaiter::new(),
        }
    }

    /// Create a harness with a custom waiter
    pub fn with_waiter(backend: Box<dyn DeploymentBackend>, waiter: StackWaiter) -> Self {
        Self { backend, waiter }
    }

    /// Package the template and deploy it under a generated stack name
    ///
    /// The packaged artifact is scoped to this call and removed on every
    /// exit path.
    pub async fn deploy(
        &self,
        template: &Path,
        parameters: &HashMap<String, String>,
        capabilities: &[String],
    ) -> Result<DeployedStack> {
        let stack_id = generate_id("stack");

        let artifact = self
            .backend
            .package(template)
            .await
            .with_context(|| format!("packaging {}", template.display()))?;

        let log = self
            .backend
            .create_or_update(artifact.path(), &stack_id, parameters, capabilities)
            .await
            .with_context(|| format!("deploying stack {stack_id}"))?;
        debug!(stack = %stack_id, log = %log.trim(), "deployed");

        info!(stack = %stack_id, backend = self.backend.name(), "stack deployment requested");
        Ok(DeployedStack {
            stack_id,
            key_pair: None,
        })
    }

    /// Provision a key pair for remote-command probes against this stack
    ///
    /// Returns the private key material; the pair's name is remembered on
    /// the stack so teardown can remove it.
    pub async fn provision_key_pair(&self, stack: &mut DeployedStack) -> Result<String> {
        let name = generate_id("key");
        let material = self
            .backend
            .create_key_pair(&name)
            .await
            .with_context(|| format!("creating key pair {name}"))?;
        stack.key_pair = Some(name);
        Ok(material)
    }

    /// Wait for the stack to exist and then report ready
    pub async fn await_ready(&self, stack: &DeployedStack) -> Result<WaitReport> {
        self.waiter
            .await_ready(self.backend.as_ref(), &stack.stack_id)
            .await
            .with_context(|| format!("awaiting stack {}", stack.stack_id))
    }

    /// Outputs of the deployed stack
    pub async fn outputs(&self, stack: &DeployedStack) -> Result<HashMap<String, String>> {
        self.backend
            .describe_outputs(&stack.stack_id)
            .await
            .with_context(|| format!("reading outputs of stack {}", stack.stack_id))
    }

    /// Delete the stack, wait for the deletion, and clean up ancillary
    /// resources
    ///
    /// Ancillary cleanup is best-effort: failures are logged and
    /// swallowed so they cannot mask the teardown result.
    pub async fn teardown(&self, stack: DeployedStack) -> Result<()> {
        self.backend
            .delete(&stack.stack_id)
            .await
            .with_context(|| format!("deleting stack {}", stack.stack_id))?;

        self.waiter
            .await_deleted(self.backend.as_ref(), &stack.stack_id)
            .await
            .with_context(|| format!("awaiting deletion of stack {}", stack.stack_id))?;

        if let Some(name) = &stack.key_pair {
            if let Err(err) = self.backend.delete_key_pair(name).await {
                warn!(key_pair = %name, error = %err, "failed to delete key pair");
            }
        }

        info!(stack = %stack.stack_id, "stack torn down");
        Ok(())
    }
}
