//! The local repository the history is read from.
//!
//! Either an existing checkout supplied by the user (fast-forwarded to its
//! upstream first) or a fresh clone into a temporary directory that is removed
//! when the [`Checkout`] is dropped. Fresh clones skip the working tree since
//! only history is needed.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{CheckoutConfig, GitError, GitResult, run_git_sync};

/// A ready-to-read repository.
#[derive(Debug)]
pub struct Checkout {
    path: PathBuf,
    /// Owns the clone directory when this checkout is temporary.
    temp: Option<TempDir>,
}

impl Checkout {
    /// Updates the configured checkout, or clones the upstream if none is set.
    pub fn prepare(config: &CheckoutConfig) -> GitResult<Self> {
        match &config.path {
            Some(path) => Self::update(path),
            None => Self::clone_upstream(&config.upstream),
        }
    }

    fn update(path: &Path) -> GitResult<Self> {
        if !path.is_dir() {
            return Err(GitError::CheckoutMissing(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), "updating existing checkout");
        run_git_sync(path, &["pull", "--ff-only", "--quiet"])?;

        Ok(Checkout {
            path: path.to_path_buf(),
            temp: None,
        })
    }

    fn clone_upstream(upstream: &str) -> GitResult<Self> {
        let temp = tempfile::Builder::new()
            .prefix("canary-bisect-")
            .tempdir()?;

        tracing::info!(upstream, path = %temp.path().display(), "cloning upstream");
        run_git_sync(
            temp.path(),
            &["clone", "--no-checkout", "--quiet", upstream, "."],
        )?;

        Ok(Checkout {
            path: temp.path().to_path_buf(),
            temp: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if this checkout is a temporary clone.
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}
