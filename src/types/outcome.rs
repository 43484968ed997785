//! The three-way verdict of probing one candidate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of evaluating a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The candidate shows the old behavior.
    DoesNotSatisfy,

    /// The candidate shows the new (regressed) behavior.
    Satisfies,

    /// The candidate could not be evaluated (e.g. its build does not exist).
    Unknown,
}

impl Outcome {
    /// Maps a test script's exit status to an outcome.
    ///
    /// Exit 0 is the old behavior and `skip_code` marks the candidate as
    /// untestable. Every other status, including termination by a signal
    /// (`None`), counts as the new behavior.
    pub fn from_exit_code(code: Option<i32>, skip_code: i32) -> Self {
        match code {
            Some(0) => Outcome::DoesNotSatisfy,
            Some(c) if c == skip_code => Outcome::Unknown,
            _ => Outcome::Satisfies,
        }
    }

    /// Returns true for `Satisfies` and `DoesNotSatisfy`.
    pub fn is_known(self) -> bool {
        !matches!(self, Outcome::Unknown)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::DoesNotSatisfy => "old",
            Outcome::Satisfies => "new",
            Outcome::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
