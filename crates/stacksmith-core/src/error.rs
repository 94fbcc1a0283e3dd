//! Error types for stacksmith-core

use thiserror::Error;

/// Result type alias using stacksmith-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Harness error taxonomy
///
/// Configuration and cardinality errors are terminal: retrying cannot fix
/// them, so they must propagate immediately instead of being fed back into
/// a retry session. `is_retryable` encodes that split.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration field absent
    #[error("Missing required configuration: {field}")]
    ConfigurationMissing { field: String },

    /// Stack lookup found zero or multiple matches for a unique identifier
    #[error("Expected exactly one stack named {stack}, found {count}")]
    UnexpectedStackCount { stack: String, count: usize },

    /// A polling phase did not reach the expected state within its attempt cap
    #[error("Timed out waiting for stack {stack} to reach {phase} after {attempts} attempts")]
    WaitTimeout {
        stack: String,
        phase: String,
        attempts: u32,
    },

    /// The stack entered a state it cannot recover from (rollback, failure)
    #[error("Stack {stack} entered non-recoverable status {status}")]
    StackFailed { stack: String, status: String },

    /// A backend CLI invocation exited non-zero
    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A required CLI tool is not installed
    #[error("Required tool not found on PATH: {tool}")]
    ToolMissing { tool: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration missing error
    pub fn configuration_missing(field: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            field: field.into(),
        }
    }

    /// Create an unexpected stack count error
    pub fn unexpected_stack_count(stack: impl Into<String>, count: usize) -> Self {
        Self::UnexpectedStackCount {
            stack: stack.into(),
            count,
        }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(stack: impl Into<String>, phase: impl Into<String>, attempts: u32) -> Self {
        Self::WaitTimeout {
            stack: stack.into(),
            phase: phase.into(),
            attempts,
        }
    }

    /// Create a stack failed error
    pub fn stack_failed(stack: impl Into<String>, status: impl Into<String>) -> Self {
        Self::StackFailed {
            stack: stack.into(),
            status: status.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
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
        !matches!(
            self,
            Error::ConfigurationMissing { .. }
                | Error::UnexpectedStackCount { .. }
                | Error::ToolMissing { .. }
                | Error::StackFailed { .. }
        )
    }
}
