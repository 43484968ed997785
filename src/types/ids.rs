//! Newtype wrappers for candidate identifiers.
//!
//! Candidates handed to the search engine are commit SHAs taken straight from
//! `git log`. Wrapping them keeps a validated hash apart from the free-form
//! references a user types on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of a full hex-encoded SHA-1 commit id.
pub const SHA_LEN: usize = 40;

/// Error returned when a string is not a full 40-character hex SHA.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid SHA {0:?}: expected {SHA_LEN} hex characters")]
pub struct InvalidSha(pub String);

/// A git commit SHA (40 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sha(String);

impl Sha {
    /// Parses a full SHA, normalizing to lowercase.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, InvalidSha> {
        let s = s.as_ref().trim();
        if s.len() == SHA_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Sha(s.to_ascii_lowercase()))
        } else {
            Err(InvalidSha(s.to_string()))
        }
    }

    /// Returns the SHA as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short (7-character) version of the SHA for display.
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for Sha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Sha {
    type Error = InvalidSha;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Sha::parse(s)
    }
}
