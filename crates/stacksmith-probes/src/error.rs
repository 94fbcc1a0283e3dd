//! Error types for probe attempts

use thiserror::Error;

/// Failures a single probe attempt can produce
///
/// Everything except a missing client tool is worth another attempt: a
/// non-success HTTP status or a refused connection is exactly what a probe
/// expects to see while a stack warms up.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The endpoint answered with a non-success status
    #[error("HTTP request returned status {status}")]
    HttpStatus { status: u16 },

    /// The HTTP request failed below the protocol level
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote command exited non-zero or the session could not open
    #[error("Remote command `{command}` failed: {stderr}")]
    RemoteCommand { command: String, stderr: String },

    /// The ssh client is not installed
    #[error("Required tool not found on PATH: {tool}")]
    ToolMissing { tool: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Create an HTTP status error
    pub fn http_status(status: u16) -> Self {
        Self::HttpStatus { status }
    }

    /// Create a remote command error
    pub fn remote_command(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::RemoteCommand {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a tool missing error
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Whether another attempt could plausibly change the outcome
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProbeError::ToolMissing { .. })
    }
}
