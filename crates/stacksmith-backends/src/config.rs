//! Harness configuration
//!
//! Settings are built explicitly and passed into the backend constructor;
//! nothing reads ambient process state after construction. `from_env` is
//! the single place the environment is consulted, and it fails fast when
//! a required variable is absent.

use serde::{Deserialize, Serialize};
use stacksmith_core::{Error, Result};

/// Environment variable naming the artifact bucket
pub const ARTIFACT_BUCKET_VAR: &str = "STACKSMITH_ARTIFACT_BUCKET";

/// Environment variable naming the region override
pub const REGION_VAR: &str = "AWS_REGION";

/// Settings for a deployment backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarnessConfig {
    /// Bucket receiving packaged template artifacts
    pub artifact_bucket: String,

    /// Region override; when unset the CLI's own default resolution applies
    #[serde(default)]
    pub region: Option<String>,
}

impl HarnessConfig {
    /// Create a config with the given artifact bucket
    pub fn new(artifact_bucket: impl Into<String>) -> Self {
        Self {
            artifact_bucket: artifact_bucket.into(),
            region: None,
        }
    }

    /// Set a region override
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Read the config from the process environment
    pub fn from_env() -> Result<Self> {
        let artifact_bucket = std::env::var(ARTIFACT_BUCKET_VAR)
            .map_err(|_| Error::configuration_missing(ARTIFACT_BUCKET_VAR))?;

        Ok(Self {
            artifact_bucket,
            region: std::env::var(REGION_VAR).ok(),
        })
    }

    /// Check that every required field is usable
    pub fn validate(&self) -> Result<()> {
        if self.artifact_bucket.trim().is_empty() {
            return Err(Error::configuration_missing("artifact-bucket"));
        }
        Ok(())
    }
}
