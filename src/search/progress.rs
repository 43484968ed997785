//! Advisory progress estimate handed to the oracle before each probe.

use serde::Serialize;

/// How much work is left, as seen from the current frontier.
///
/// Purely informational: the engine never reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressHint {
    /// Candidates still to test after this probe, assuming no gaps.
    pub remaining: usize,

    /// Rough number of further probes (`floor(log2(range))`).
    pub steps: u32,
}

impl ProgressHint {
    /// Computes the hint for the frontier `(no_upper_bound, yes_lower_bound)`.
    pub fn between(no_upper_bound: usize, yes_lower_bound: usize) -> Self {
        let range = yes_lower_bound.saturating_sub(no_upper_bound) + 1;
        let steps = if range < 3 { 0 } else { range.ilog2() };
        ProgressHint {
            remaining: range / 2,
            steps,
        }
    }
}
