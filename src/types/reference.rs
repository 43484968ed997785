//! Human-facing endpoint references (`--from` / `--to`).
//!
//! A reference is either a release version (`1.46.0`, `v1.45.2`) or a canary
//! commit hash. Versions are located on the main branch through the subject of
//! the commit that bumped or forwarded that release.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing a reference string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The reference was empty after trimming.
    #[error("empty reference")]
    Empty,

    /// A dotted reference was not `MAJOR.MINOR.PATCH`.
    #[error("invalid version {input:?}: {reason}")]
    InvalidVersion { input: String, reason: String },
}

/// An endpoint of the bisection as named by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A release, e.g. `v1.46.3`.
    Version { major: u64, minor: u64, patch: u64 },

    /// A canary build, named by the commit it was built from.
    Canary(String),
}

impl Reference {
    /// Parses a reference. Anything containing a `.` is treated as a version.
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReferenceError::Empty);
        }
        if !s.contains('.') {
            return Ok(Reference::Canary(s.to_string()));
        }

        let invalid = |reason: &str| ReferenceError::InvalidVersion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let digits = s.strip_prefix('v').unwrap_or(s);
        let parts: Vec<&str> = digits.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(invalid("expected three components"));
        };
        let number = |part: &str| {
            part.parse::<u64>()
                .map_err(|_| invalid(&format!("not a number: {part:?}")))
        };

        Ok(Reference::Version {
            major: number(*major)?,
            minor: number(*minor)?,
            patch: number(*patch)?,
        })
    }

    /// The commit subject fragment that marks this release on the main branch.
    ///
    /// Minor releases land as a version bump; patch releases are forwarded
    /// from their release branch. Canary references have no marker.
    pub fn release_marker(&self) -> Option<String> {
        match self {
            Reference::Version {
                major,
                minor,
                patch: 0,
            } => Some(format!("Bumped versions for {major}.{minor}.0")),
            Reference::Version {
                major,
                minor,
                patch,
            } => Some(format!(
                "forward v{major}.{minor}.{patch} release commit to main"
            )),
            Reference::Canary(_) => None,
        }
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Version {
                major,
                minor,
                patch,
            } => write!(f, "v{major}.{minor}.{patch}"),
            Reference::Canary(hash) => write!(f, "canary {hash}"),
        }
    }
}
