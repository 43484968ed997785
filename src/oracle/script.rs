//! Judges a canary by installing it and running a user script against it.
//!
//! Each probe does two things in order:
//! 1. `<tool> upgrade --canary --version <sha>` swaps the active toolchain for
//!    the canary built from `<sha>`. Output is captured; if the command fails
//!    the build is assumed not to exist.
//! 2. `<tool> run -A --no-lock <script>` runs the test with inherited stdio.
//!    The exit status decides the outcome (see [`Outcome::from_exit_code`]).

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

use crate::search::ProgressHint;
use crate::types::{Outcome, Sha};

use super::{OracleConfig, Probe};

/// Errors from a single script probe.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A process could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The toolchain switch failed; usually no canary was published for it.
    #[error("canary build for {candidate} is unavailable: {stderr}")]
    BuildUnavailable { candidate: Sha, stderr: String },
}

/// A [`Probe`] that switches canaries and runs a test script.
#[derive(Debug, Clone)]
pub struct ScriptOracle {
    config: OracleConfig,
    script: PathBuf,
}

impl ScriptOracle {
    pub fn new(config: OracleConfig, script: impl Into<PathBuf>) -> Self {
        ScriptOracle {
            config,
            script: script.into(),
        }
    }

    fn tool_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.tool);
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: io::Error) -> ScriptError {
        ScriptError::Spawn {
            program: self.config.tool.clone(),
            source,
        }
    }

    /// Installs the canary built from `candidate`.
    async fn switch_to(&self, candidate: &Sha) -> Result<(), ScriptError> {
        let output = self
            .tool_command()
            .args(["upgrade", "--canary", "--version", candidate.as_str()])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ScriptError::BuildUnavailable {
                candidate: candidate.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Runs the test script under the active toolchain.
    async fn run_script(&self) -> Result<Outcome, ScriptError> {
        let status = self
            .tool_command()
            .args(["run", "-A", "--no-lock"])
            .arg(&self.script)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(Outcome::from_exit_code(
            status.code(),
            self.config.skip_exit_code,
        ))
    }
}

impl Probe<Sha> for ScriptOracle {
    type Error = ScriptError;

    async fn probe(&mut self, candidate: &Sha, hint: ProgressHint) -> Result<Outcome, ScriptError> {
        tracing::info!(
            candidate = %candidate,
            remaining = hint.remaining,
            steps = hint.steps,
            "on {}: {} versions to test after this (roughly {} steps)",
            candidate,
            hint.remaining,
            hint.steps
        );

        self.switch_to(candidate).await?;
        let outcome = self.run_script().await?;

        tracing::info!(candidate = %candidate.short(), %outcome, "candidate evaluated");
        Ok(outcome)
    }
}
