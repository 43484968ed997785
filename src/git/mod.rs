//! Local git operations: preparing a checkout and reading its history.
//!
//! This module provides:
//! - Checkout management (clone the upstream or update an existing checkout)
//! - History queries (resolve references, list candidates between two commits)
//!
//! Every command runs through [`git_command`], which ignores system and user
//! git configuration so results do not depend on the machine.

pub mod checkout;
pub mod history;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;

use crate::types::{InvalidSha, Sha};

pub use checkout::Checkout;
pub use history::{LogEntry, candidates_between, find_commit_with, history, resolve};

/// Upstream cloned when no existing checkout is given.
pub const DEFAULT_UPSTREAM: &str = "https://github.com/denoland/deno";

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command failed.
    #[error("git command failed: {command}\nstderr: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Git printed something that is not a commit SHA.
    #[error(transparent)]
    InvalidSha(#[from] InvalidSha),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A reference could not be resolved to a commit.
    #[error("could not find a commit for {reference}")]
    RefNotFound { reference: String },

    /// The old endpoint is not an ancestor of the new one.
    #[error("{from} is not an ancestor of {to}")]
    NotAncestor { from: Sha, to: Sha },

    /// The old endpoint is reachable from the new one, but only through a
    /// merged side branch, so it is not one of the mainline candidates.
    #[error("{from} is not on the mainline history of {to}")]
    NotOnMainline { from: Sha, to: Sha },

    /// The checkout path given by the user does not exist.
    #[error("checkout path {} doesn't exist", .0.display())]
    CheckoutMissing(PathBuf),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Where the history comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// URL (or path) cloned into a temporary directory when `path` is unset.
    pub upstream: String,

    /// An existing checkout to update and use instead of cloning.
    pub path: Option<PathBuf>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            upstream: DEFAULT_UPSTREAM.to_string(),
            path: None,
        }
    }
}

impl CheckoutConfig {
    /// Creates a `CheckoutConfig` from environment variables.
    ///
    /// Reads `CANARY_BISECT_UPSTREAM` for the upstream URL.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let upstream = lookup("CANARY_BISECT_UPSTREAM")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM.to_string());
        CheckoutConfig {
            upstream,
            path: None,
        }
    }
}

/// Builds a `git` invocation rooted at `workdir`.
///
/// System and global config are ignored so that user aliases, hooks, pagers
/// or credential prompts cannot change what the bisector sees.
pub(crate) fn git_command(workdir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(workdir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_TERMINAL_PROMPT", "0");
    cmd
}

fn command_failed(args: &[&str], output: &Output) -> GitError {
    GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Runs git with `args`, failing on a non-zero exit.
pub fn run_git_sync(workdir: &Path, args: &[&str]) -> GitResult<Output> {
    let output = git_command(workdir).args(args).output()?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(command_failed(args, &output))
    }
}

/// Runs git with `args` and returns its trimmed stdout.
pub fn run_git_stdout(workdir: &Path, args: &[&str]) -> GitResult<String> {
    let output = run_git_sync(workdir, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// True if `ancestor` is reachable from `descendant` (or is the same commit).
pub fn is_ancestor(workdir: &Path, ancestor: &Sha, descendant: &Sha) -> GitResult<bool> {
    let args = [
        "merge-base",
        "--is-ancestor",
        ancestor.as_str(),
        descendant.as_str(),
    ];
    let output = git_command(workdir).args(args).output()?;

    // merge-base reports "no" as exit 1; anything else is a real failure.
    match output.status.code() {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        _ => Err(command_failed(&args, &output)),
    }
}

/// Resolves `rev` to a full commit SHA.
pub fn rev_parse(workdir: &Path, rev: &str) -> GitResult<Sha> {
    let sha = run_git_stdout(workdir, &["rev-parse", "--verify", rev])?;
    Ok(Sha::parse(sha)?)
}
