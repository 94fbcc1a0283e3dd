//! Remote-command probe over SSH
//!
//! One attempt is one invocation of the system ssh client against the
//! target, returning captured stdout. The private key is written to a
//! mode-0600 scoped temp file that lives for the probe session and is
//! removed with it.

use crate::error::ProbeError;
use stacksmith_core::retry::{ClosurePredicate, RetryError, RetryExecutorBuilder, TracingObserver};
use stacksmith_core::types::RetryPolicy;
use std::path::Path;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// Default liveness command run on the target
pub const DEFAULT_COMMAND: &str = "uptime";

/// A remote host to probe
#[derive(Debug, Clone)]
pub struct SshTarget {
    /// Hostname or address
    pub host: String,
    /// Login user
    pub user: String,
    /// SSH port
    pub port: u16,
}

impl SshTarget {
    /// Target on the default SSH port
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            port: 22,
        }
    }

    /// Set a non-default port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Probe the target with the default liveness command and retry budget
pub async fn probe(
    target: &SshTarget,
    private_key_pem: &str,
) -> Result<String, RetryError<ProbeError>> {
    probe_with_policy(target, private_key_pem, DEFAULT_COMMAND, &RetryPolicy::default()).await
}

/// Probe the target with an explicit command and retry policy
pub async fn probe_with_policy(
    target: &SshTarget,
    private_key_pem: &str,
    command: &str,
    policy: &RetryPolicy,
) -> Result<String, RetryError<ProbeError>> {
    let key_file = match write_key_file(private_key_pem) {
        Ok(file) => file,
        Err(err) => return Err(RetryError::non_retryable(err)),
    };

    if which::which("ssh").is_err() {
        return Err(RetryError::non_retryable(ProbeError::tool_missing("ssh")));
    }

    RetryExecutorBuilder::new()
        .with_policy(policy.clone())
        .with_predicate(ClosurePredicate::new(|err: &ProbeError| err.is_retryable()))
        .with_observer(TracingObserver::new("ssh-probe"))
        .build()
        .execute(|| {
            let target = target.clone();
            let key_path = key_file.path().to_path_buf();
            let command = command.to_string();
            async move { attempt(&target, &key_path, &command).await }
        })
        .await
}

async fn attempt(
    target: &SshTarget,
    key_path: &Path,
    command: &str,
) -> Result<String, ProbeError> {
    let args = ssh_args(target, key_path, command);
    debug!(host = %target.host, command = command, "ssh");

    let output = Command::new("ssh")
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Err(ProbeError::remote_command(
            command,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Argument list for one non-interactive ssh invocation
fn ssh_args(target: &SshTarget, key_path: &Path, command: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        key_path.display().to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "UserKnownHostsFile=/dev/null".to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "ConnectTimeout=10".to_string(),
        "-p".to_string(),
        target.port.to_string(),
        format!("{}@{}", target.user, target.host),
        command.to_string(),
    ]
}

/// Write the private key to a scoped temp file readable only by the owner
fn write_key_file(private_key_pem: &str) -> Result<NamedTempFile, ProbeError> {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .prefix("stacksmith-key-")
        .tempfile()?;
    file.write_all(private_key_pem.as_bytes())?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}
