//! Mock backend for harness integration tests
//!
//! Scripted behavior, no network or CLI: stacks become visible after a
//! configured number of existence polls and ready after a configured
//! number of readiness polls, and every invocation is recorded through a
//! shared handle the test keeps after boxing the backend.

#![allow(dead_code)]

use async_trait::async_trait;
use stacksmith_backends::artifact::PackagedTemplate;
use stacksmith_backends::traits::DeploymentBackend;
use stacksmith_core::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Record of a deploy invocation
#[derive(Clone, Debug)]
pub struct DeployCall {
    pub stack_id: String,
    pub template: PathBuf,
    pub template_existed: bool,
}

/// Everything a session did to the backend, in order of occurrence
#[derive(Default)]
pub struct Recorded {
    pub packaged: Vec<PathBuf>,
    pub deploys: Vec<DeployCall>,
    pub deletes: Vec<String>,
    pub created_keys: Vec<String>,
    pub deleted_keys: Vec<String>,
    pub exist_polls: u32,
    pub ready_polls: u32,
    pub delete_polls: u32,
    pub existence_caps: Vec<u32>,
    pub ready_caps: Vec<u32>,
}

pub type Recordings = Arc<Mutex<Recorded>>;

pub struct ScriptedBackend {
    /// Existence polls before the stack reports present
    pub exists_after: u32,
    /// Readiness polls before the stack reports ready
    pub ready_after: u32,
    /// Deletion polls before the stack reports gone
    pub deleted_after: u32,
    pub outputs: HashMap<String, String>,
    pub fail_deploy: bool,
    pub fail_delete_key_pair: bool,
    recorded: Recordings,
}

impl ScriptedBackend {
    pub fn ready_immediately() -> Self {
        Self::new(1, 1)
    }

    pub fn new(exists_after: u32, ready_after: u32) -> Self {
        Self {
            exists_after,
            ready_after,
            deleted_after: 1,
            outputs: HashMap::from([(
                "Endpoint".to_string(),
                "https://example.test".to_string(),
            )]),
            fail_deploy: false,
            fail_delete_key_pair: false,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Handle to the recordings, usable after the backend is boxed
    pub fn recordings(&self) -> Recordings {
        self.recorded.clone()
    }

    fn record<F: FnOnce(&mut Recorded)>(&self, f: F) {
        f(&mut self.recorded.lock().unwrap());
    }

    async fn poll<F>(
        &self,
        threshold: u32,
        stack_id: &str,
        phase: &str,
        poll_interval: Duration,
        max_attempts: u32,
        mut bump: F,
    ) -> Result<()>
    where
        F: FnMut(&mut Recorded) -> u32,
    {
        for attempt in 1..=max_attempts {
            let polls = {
                let mut recorded = self.recorded.lock().unwrap();
                bump(&mut recorded)
            };
            if polls >= threshold {
                return Ok(());
            }
            if attempt < max_attempts {
                tokio::time::sleep(poll_interval).await;
            }
        }
        Err(Error::wait_timeout(stack_id, phase, max_attempts))
    }
}

#[async_trait]
impl DeploymentBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn package(&self, _template: &Path) -> Result<PackagedTemplate> {
        let artifact = PackagedTemplate::create()?;
        let path = artifact.path_buf();
        self.record(|r| r.packaged.push(path));
        Ok(artifact)
    }

    async fn create_or_update(
        &self,
        template: &Path,
        stack_id: &str,
        _parameters: &HashMap<String, String>,
        _capabilities: &[String],
    ) -> Result<String> {
        let call = DeployCall {
            stack_id: stack_id.to_string(),
            template: template.to_path_buf(),
            template_existed: template.exists(),
        };
        self.record(|r| r.deploys.push(call));
        if self.fail_deploy {
            return Err(Error::command_failed("deploy", "scripted failure"));
        }
        Ok("deployed".to_string())
    }

    async fn delete(&self, stack_id: &str) -> Result<String> {
        self.record(|r| r.deletes.push(stack_id.to_string()));
        Ok("delete requested".to_string())
    }

    async fn describe_outputs(&self, _stack_id: &str) -> Result<HashMap<String, String>> {
        Ok(self.outputs.clone())
    }

    async fn create_key_pair(&self, name: &str) -> Result<String> {
        self.record(|r| r.created_keys.push(name.to_string()));
        Ok("-----BEGIN TEST KEY-----".to_string())
    }

    async fn delete_key_pair(&self, name: &str) -> Result<()> {
        self.record(|r| r.deleted_keys.push(name.to_string()));
        if self.fail_delete_key_pair {
            return Err(Error::command_failed("delete-key-pair", "scripted failure"));
        }
        Ok(())
    }

    async fn wait_for_existence(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        self.record(|r| r.existence_caps.push(max_attempts));
        self.poll(
            self.exists_after,
            stack_id,
            "existence",
            poll_interval,
            max_attempts,
            |r| {
                r.exist_polls += 1;
                r.exist_polls
            },
        )
        .await
    }

    async fn wait_for_ready(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        self.record(|r| r.ready_caps.push(max_attempts));
        self.poll(
            self.ready_after,
            stack_id,
            "ready",
            poll_interval,
            max_attempts,
            |r| {
                r.ready_polls += 1;
                r.ready_polls
            },
        )
        .await
    }

    async fn wait_for_deleted(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        self.poll(
            self.deleted_after,
            stack_id,
            "deleted",
            poll_interval,
            max_attempts,
            |r| {
                r.delete_polls += 1;
                r.delete_polls
            },
        )
        .await
    }
}
