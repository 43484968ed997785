//! The outcome of a bisection, resolved back to commits.
//!
//! The search engine works on positions; a [`BisectReport`] maps those back
//! to SHAs so results can be printed for a person or emitted as JSON.
//!
//! # Human format
//!
//! ```text
//! Bisection complete, regressed in <sha>
//! ```
//!
//! or, when untestable canaries hide the exact commit:
//!
//! ```text
//! Bisection inconclusive, regressed in one of 3 commits:
//!   <sha> (untestable)
//!   <sha> (untestable)
//!   <sha>
//! ```

use serde::Serialize;

use crate::search::{Bisection, UnknownSpan, Verdict};
use crate::types::{Reference, Sha};

/// A run of consecutive candidates that could not be tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRange {
    pub first: Sha,
    pub last: Sha,
    pub count: usize,
}

impl SkippedRange {
    fn from_span(candidates: &[Sha], span: &UnknownSpan) -> Self {
        SkippedRange {
            first: candidates[span.left].clone(),
            last: candidates[span.right].clone(),
            count: span.len(),
        }
    }
}

/// Whether the regressing commit is known exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Confirmed,
    Ambiguous,
}

/// Everything worth knowing about a finished bisection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BisectReport {
    /// The old endpoint as the user wrote it.
    pub from: String,

    /// The new endpoint as the user wrote it.
    pub to: String,

    /// First commit known to show the new behavior.
    pub regressed: Sha,

    pub status: Status,

    /// Commits that may have introduced the regression, oldest first.
    /// Holds only `regressed` when the result is confirmed.
    pub suspects: Vec<Sha>,

    /// Untestable runs found along the way.
    pub skipped: Vec<SkippedRange>,

    /// Total number of candidates, endpoints included.
    pub candidates: usize,

    /// Number of canaries actually tested.
    pub evaluations: usize,
}

impl BisectReport {
    /// Builds a report for `bisection`, which ran over `candidates`.
    pub fn new(from: &Reference, to: &Reference, candidates: &[Sha], bisection: &Bisection) -> Self {
        let status = match bisection.verdict {
            Verdict::Confirmed => Status::Confirmed,
            Verdict::Ambiguous { .. } => Status::Ambiguous,
        };

        BisectReport {
            from: from.to_string(),
            to: to.to_string(),
            regressed: candidates[bisection.index].clone(),
            status,
            suspects: candidates[bisection.suspects()].to_vec(),
            skipped: bisection
                .unknown_spans
                .iter()
                .map(|span| SkippedRange::from_span(candidates, span))
                .collect(),
            candidates: candidates.len(),
            evaluations: bisection.evaluations,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == Status::Confirmed
    }
}

/// Formats a report for the terminal.
pub fn format_summary(report: &BisectReport) -> String {
    if report.is_confirmed() {
        return format!("Bisection complete, regressed in {}", report.regressed);
    }

    let mut out = format!(
        "Bisection inconclusive, regressed in one of {} commits:",
        report.suspects.len()
    );
    for sha in &report.suspects {
        if *sha == report.regressed {
            out.push_str(&format!("\n  {sha}"));
        } else {
            out.push_str(&format!("\n  {sha} (untestable)"));
        }
    }
    out
}

/// Formats a report as pretty-printed JSON.
pub fn format_json(report: &BisectReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
