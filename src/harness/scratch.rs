//! Scratch directory lifecycle
//!
//! Each child-process invocation runs inside a fresh directory staged with
//! the artifacts the executable needs, and the directory is removed once
//! the invocation finishes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Target platform, selecting which shared-library artifact to stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
}

impl Platform {
    /// Detect the platform the harness is running on. Anything that is not
    /// macOS gets the Linux artifact.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => {
                warn!("Unrecognized platform {other:?}, staging the Linux shared library");
                Platform::Linux
            }
        }
    }

    /// File name of the shared library this platform's loader accepts.
    pub fn shared_library(&self) -> &'static str {
        match self {
            Platform::Linux => "lib.so",
            Platform::MacOs => "lib.dylib",
        }
    }
}

/// A scratch working directory under the run's base directory.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh scratch directory named `name` under `base`.
    pub async fn create(base: &Path, name: &str) -> Result<Self> {
        let path = base.join(name);
        tokio::fs::create_dir_all(&path)
            .await
            .with_context(|| format!("creating scratch directory {}", path.display()))?;
        debug!("Staged scratch directory {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy a file from the base directory into the scratch directory,
    /// keeping its name. A missing artifact is reported but does not abort
    /// the run.
    pub async fn stage(&self, src: &Path) -> bool {
        let Some(name) = src.file_name() else {
            warn!("Cannot stage {}: no file name", src.display());
            return false;
        };
        let dst = self.path.join(name);

        match tokio::fs::copy(src, &dst).await {
            Ok(_) => {
                debug!("Staged {} into {}", src.display(), self.path.display());
                true
            }
            Err(e) => {
                warn!("Failed to stage {}: {}", src.display(), e);
                false
            }
        }
    }

    /// Copy a file produced inside the scratch directory back out.
    pub async fn retrieve(&self, name: &str, dst: &Path) -> bool {
        let src = self.path.join(name);
        match tokio::fs::copy(&src, dst).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to retrieve {}: {}", src.display(), e);
                false
            }
        }
    }

    /// Remove the scratch directory and everything in it.
    pub async fn teardown(self) -> Result<()> {
        tokio::fs::remove_dir_all(&self.path)
            .await
            .with_context(|| format!("removing scratch directory {}", self.path.display()))?;
        debug!("Removed scratch directory {}", self.path.display());
        Ok(())
    }
}
