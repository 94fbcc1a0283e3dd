//! Scoped packaged-template artifacts

use stacksmith_core::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

/// A packaged template on disk, removed when dropped
///
/// Acquisition and release are paired: the file exists for exactly as long
/// as the value does, on every exit path. Removal failures are logged and
/// swallowed so cleanup can never mask the result of a harness run.
#[derive(Debug)]
pub struct PackagedTemplate {
    file: Option<NamedTempFile>,
}

impl PackagedTemplate {
    /// Allocate an empty artifact file for the packager to write into
    pub fn create() -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("stacksmith-pkg-")
            .suffix(".yaml")
            .tempfile()?;
        Ok(Self { file: Some(file) })
    }

    /// Path of the packaged template on disk
    pub fn path(&self) -> &Path {
        match &self.file {
            Some(file) => file.path(),
            // Only reachable after Drop has started
            None => Path::new(""),
        }
    }

    /// Owned copy of the artifact path
    pub fn path_buf(&self) -> PathBuf {
        self.path().to_path_buf()
    }
}

impl Drop for PackagedTemplate {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            if let Err(err) = file.close() {
                warn!(path = %path.display(), error = %err, "failed to remove packaged template");
            }
        }
    }
}
