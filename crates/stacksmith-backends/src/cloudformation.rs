//! CloudFormation deployment backend
//!
//! Thin glue over the `aws` CLI. Stack state is read through
//! `describe-stacks` so the wait primitives can honor whatever poll
//! interval and attempt cap the caller hands down.

use crate::artifact::PackagedTemplate;
use crate::config::HarnessConfig;
use crate::traits::DeploymentBackend;
use async_trait::async_trait;
use serde::Deserialize;
use stacksmith_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Stack states accepted as ready
const READY_STATES: &[&str] = &["CREATE_COMPLETE", "UPDATE_COMPLETE"];

/// CloudFormation backend shelling out to the `aws` CLI
pub struct CloudFormationBackend {
    config: HarnessConfig,
}

impl CloudFormationBackend {
    /// Create a backend, validating config and tool availability up front
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        if which::which("aws").is_err() {
            return Err(Error::tool_missing("aws"));
        }
        Ok(Self { config })
    }

    async fn run(&self, mut args: Vec<String>) -> Result<String> {
        if let Some(region) = &self.config.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        debug!(args = ?args, "aws");

        let output = Command::new("aws").args(&args).output().await?;
        if !output.status.success() {
            return Err(Error::command_failed(
                format!("aws {}", args.join(" ")),
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Current status of the stack, `None` when it does not exist
    async fn stack_status(&self, stack_id: &str) -> Result<Option<String>> {
        let args = vec![
            "cloudformation".to_string(),
            "describe-stacks".to_string(),
            "--stack-name".to_string(),
            stack_id.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];

        match self.run(args).await {
            Ok(stdout) => {
                let response: DescribeStacksResponse = serde_json::from_str(&stdout)?;
                Ok(response
                    .stacks
                    .into_iter()
                    .find(|s| s.stack_name == stack_id)
                    .map(|s| s.stack_status))
            }
            Err(Error::CommandFailed { stderr, .. }) if stderr.contains("does not exist") => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn wait_for(
        &self,
        condition: WaitCondition,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        let max_attempts = max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let status = self.stack_status(stack_id).await?;
            if condition_met(condition, stack_id, status.as_deref())? {
                return Ok(());
            }
            if attempt < max_attempts {
                tokio::time::sleep(poll_interval).await;
            }
        }
        Err(Error::wait_timeout(stack_id, condition.phase(), max_attempts))
    }
}

#[async_trait]
impl DeploymentBackend for CloudFormationBackend {
    fn name(&self) -> &'static str {
        "cloudformation"
    }

    async fn package(&self, template: &Path) -> Result<PackagedTemplate> {
        let artifact = PackagedTemplate::create()?;
        self.run(vec![
            "cloudformation".to_string(),
            "package".to_string(),
            "--template-file".to_string(),
            template.display().to_string(),
            "--s3-bucket".to_string(),
            self.config.artifact_bucket.clone(),
            "--output-template-file".to_string(),
            artifact.path().display().to_string(),
        ])
        .await?;
        Ok(artifact)
    }

    async fn create_or_update(
        &self,
        template: &Path,
        stack_id: &str,
        parameters: &HashMap<String, String>,
        capabilities: &[String],
    ) -> Result<String> {
        self.run(deploy_args(template, stack_id, parameters, capabilities))
            .await
    }

    async fn delete(&self, stack_id: &str) -> Result<String> {
        self.run(vec![
            "cloudformation".to_string(),
            "delete-stack".to_string(),
            "--stack-name".to_string(),
            stack_id.to_string(),
        ])
        .await
    }

    async fn describe_outputs(&self, stack_id: &str) -> Result<HashMap<String, String>> {
        let stdout = self
            .run(vec![
                "cloudformation".to_string(),
                "describe-stacks".to_string(),
                "--stack-name".to_string(),
                stack_id.to_string(),
                "--output".to_string(),
                "json".to_string(),
            ])
            .await
            .map_err(|err| match err {
                // Zero matches: the CLI errors instead of returning an empty list
                Error::CommandFailed { stderr, .. } if stderr.contains("does not exist") => {
                    Error::unexpected_stack_count(stack_id, 0)
                }
                other => other,
            })?;

        let response: DescribeStacksResponse = serde_json::from_str(&stdout)?;
        outputs_for(response.stacks, stack_id)
    }

    async fn create_key_pair(&self, name: &str) -> Result<String> {
        let stdout = self
            .run(vec![
                "ec2".to_string(),
                "create-key-pair".to_string(),
                "--key-name".to_string(),
                name.to_string(),
                "--query".to_string(),
                "KeyMaterial".to_string(),
                "--output".to_string(),
                "text".to_string(),
            ])
            .await?;
        Ok(stdout.trim().to_string())
    }

    async fn delete_key_pair(&self, name: &str) -> Result<()> {
        self.run(vec![
            "ec2".to_string(),
            "delete-key-pair".to_string(),
            "--key-name".to_string(),
            name.to_string(),
        ])
        .await?;
        Ok(())
    }

    async fn wait_for_existence(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        self.wait_for(WaitCondition::Exists, stack_id, poll_interval, max_attempts)
            .await
    }

    async fn wait_for_ready(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        self.wait_for(WaitCondition::Ready, stack_id, poll_interval, max_attempts)
            .await
    }

    async fn wait_for_deleted(
        &self,
        stack_id: &str,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        self.wait_for(WaitCondition::Deleted, stack_id, poll_interval, max_attempts)
            .await
    }
}

#[derive(Debug, Clone, Copy)]
enum WaitCondition {
    Exists,
    Ready,
    Deleted,
}

impl WaitCondition {
    fn phase(&self) -> &'static str {
        match self {
            WaitCondition::Exists => "existence",
            WaitCondition::Ready => "ready",
            WaitCondition::Deleted => "deleted",
        }
    }
}

/// Decide whether a condition holds for the observed status
///
/// Non-recoverable statuses turn the wait into a terminal `StackFailed`
/// rather than polling the budget down on a stack that will never arrive.
fn condition_met(
    condition: WaitCondition,
    stack_id: &str,
    status: Option<&str>,
) -> Result<bool> {
    match condition {
        WaitCondition::Exists => Ok(status.is_some()),
        WaitCondition::Ready => match status {
            None => Ok(false),
            Some(s) if READY_STATES.contains(&s) => Ok(true),
            Some(s) if is_unrecoverable(s) => Err(Error::stack_failed(stack_id, s)),
            Some(_) => Ok(false),
        },
        WaitCondition::Deleted => match status {
            None => Ok(true),
            Some(s @ "DELETE_FAILED") => Err(Error::stack_failed(stack_id, s)),
            Some(_) => Ok(false),
        },
    }
}

fn is_unrecoverable(status: &str) -> bool {
    status.ends_with("_FAILED") || status.contains("ROLLBACK")
}

/// Build the `cloudformation deploy` argument list
///
/// Parameters are sorted by key so invocations are deterministic.
fn deploy_args(
    template: &Path,
    stack_id: &str,
    parameters: &HashMap<String, String>,
    capabilities: &[String],
) -> Vec<String> {
    let mut args = vec![
        "cloudformation".to_string(),
        "deploy".to_string(),
        "--template-file".to_string(),
        template.display().to_string(),
        "--stack-name".to_string(),
        stack_id.to_string(),
        "--no-fail-on-empty-changeset".to_string(),
    ];

    if !parameters.is_empty() {
        args.push("--parameter-overrides".to_string());
        let mut keys: Vec<&String> = parameters.keys().collect();
        keys.sort();
        for key in keys {
            args.push(format!("{}={}", key, parameters[key]));
        }
    }

    if !capabilities.is_empty() {
        args.push("--capabilities".to_string());
        args.extend(capabilities.iter().cloned());
    }

    args
}

/// Extract outputs from the stacks matching `stack_id`
///
/// Exactly one stack must match; anything else is `UnexpectedStackCount`.
fn outputs_for(
    stacks: Vec<StackDescription>,
    stack_id: &str,
) -> Result<HashMap<String, String>> {
    let mut matching: Vec<StackDescription> = stacks
        .into_iter()
        .filter(|s| s.stack_name == stack_id)
        .collect();

    if matching.len() != 1 {
        return Err(Error::unexpected_stack_count(stack_id, matching.len()));
    }

    let stack = matching.remove(0);
    Ok(stack
        .outputs
        .into_iter()
        .map(|o| (o.output_key, o.output_value))
        .collect())
}

#[derive(Debug, Deserialize)]
struct DescribeStacksResponse {
    #[serde(rename = "Stacks", default)]
    stacks: Vec<StackDescription>,
}

#[derive(Debug, Deserialize)]
struct StackDescription {
    #[serde(rename = "StackName")]
    stack_name: String,
    #[serde(rename = "StackStatus")]
    stack_status: String,
    #[serde(rename = "Outputs", default)]
    outputs: Vec<StackOutput>,
}

#[derive(Debug, Deserialize)]
struct StackOutput {
    #[serde(rename = "OutputKey")]
    output_key: String,
    #[serde(rename = "OutputValue")]
    output_value: String,
}
