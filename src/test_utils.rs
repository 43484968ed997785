//! Shared test utilities and arbitrary generators for property-based testing.

use std::collections::HashMap;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use crate::git::{rev_parse, run_git_sync};
use crate::oracle::Oracle;
use crate::search::ProgressHint;
use crate::types::{Outcome, Sha};

/// Candidates `0..len`, each standing for its own position.
pub fn positions(len: usize) -> Vec<usize> {
    (0..len).collect()
}

/// Parses a compact outcome script: `n` old, `y` new, `?` unknown.
pub fn outcomes(script: &str) -> Vec<Outcome> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'n' => Outcome::DoesNotSatisfy,
            'y' => Outcome::Satisfies,
            '?' => Outcome::Unknown,
            other => panic!("unknown outcome marker {other:?}"),
        })
        .collect()
}

/// An oracle that replays fixed outcomes and records every call.
#[derive(Debug, Clone)]
pub struct ScriptedOracle {
    outcomes: Vec<Outcome>,
    pub calls: Vec<usize>,
    pub hints: Vec<ProgressHint>,
}

impl ScriptedOracle {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        ScriptedOracle {
            outcomes,
            calls: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn from_script(script: &str) -> Self {
        Self::new(outcomes(script))
    }

    /// Positions evaluated more than once (should always be empty).
    pub fn repeated_calls(&self) -> Vec<usize> {
        let mut seen: HashMap<usize, usize> = HashMap::new();
        for &i in &self.calls {
            *seen.entry(i).or_default() += 1;
        }
        let mut repeated: Vec<usize> = seen
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(i, _)| i)
            .collect();
        repeated.sort_unstable();
        repeated
    }
}

impl Oracle<usize> for ScriptedOracle {
    async fn evaluate(&mut self, candidate: &usize, hint: ProgressHint) -> Outcome {
        self.calls.push(*candidate);
        self.hints.push(hint);
        self.outcomes[*candidate]
    }
}

/// Runs a future to completion on a fresh current-thread runtime.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

/// Creates an empty repository with a single commit.
pub fn init_repo() -> (TempDir, Sha) {
    let dir = TempDir::new().unwrap();
    run_git_sync(dir.path(), &["init", "--quiet"]).unwrap();
    let first = commit(dir.path(), "Initial commit");
    (dir, first)
}

/// Adds an empty commit with `subject` on top of HEAD and returns its SHA.
pub fn commit(workdir: &Path, subject: &str) -> Sha {
    run_git_sync(
        workdir,
        &[
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "commit",
            "--allow-empty",
            "--quiet",
            "-m",
            subject,
        ],
    )
    .unwrap();
    rev_parse(workdir, "HEAD").unwrap()
}

pub fn arb_sha() -> impl Strategy<Value = Sha> {
    "[0-9a-f]{40}".prop_map(|s| Sha::parse(s).unwrap())
}

/// A length and the index of the first new-behavior candidate.
///
/// The regression index is in `1..len`, so position 0 is always old and the
/// last position always new.
pub fn arb_regression(max_len: usize) -> impl Strategy<Value = (usize, usize)> {
    (2..=max_len).prop_flat_map(|len| (Just(len), 1..len))
}

/// Monotone outcomes with arbitrary interior candidates made untestable.
///
/// Returns the outcomes together with the true regression index.
pub fn arb_outcomes_with_gaps(max_len: usize) -> impl Strategy<Value = (Vec<Outcome>, usize)> {
    arb_regression(max_len).prop_flat_map(|(len, regression)| {
        prop::collection::vec(prop::bool::weighted(0.35), len).prop_map(move |unknown| {
            let outcomes = (0..len)
                .map(|i| {
                    if i != 0 && i != len - 1 && unknown[i] {
                        Outcome::Unknown
                    } else if i < regression {
                        Outcome::DoesNotSatisfy
                    } else {
                        Outcome::Satisfies
                    }
                })
                .collect();
            (outcomes, regression)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_script_parses_markers() {
        assert_eq!(
            outcomes("n ? y"),
            vec![Outcome::DoesNotSatisfy, Outcome::Unknown, Outcome::Satisfies]
        );
    }

    #[test]
    fn repeated_calls_reports_duplicates() {
        let mut oracle = ScriptedOracle::from_script("nnyy");
        oracle.calls = vec![1, 2, 1, 3, 2];
        assert_eq!(oracle.repeated_calls(), vec![1, 2]);
    }
}
