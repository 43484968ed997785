//! Maximal runs of untestable candidates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed interval `[left, right]` of candidates that all evaluated `Unknown`.
///
/// Indices are absolute positions in the candidate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnknownSpan {
    pub left: usize,
    pub right: usize,
}

// Spans are never empty.
#[allow(clippy::len_without_is_empty)]
impl UnknownSpan {
    /// Creates a span. `left` must not exceed `right`.
    pub fn new(left: usize, right: usize) -> Self {
        debug_assert!(left <= right, "span [{left}, {right}] is inverted");
        UnknownSpan { left, right }
    }

    /// Returns true if `index` lies inside the span.
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// Number of candidates covered.
    pub fn len(&self) -> usize {
        self.right - self.left + 1
    }

    /// Returns true if the span is exactly the open gap `(no, yes)`.
    pub fn fills_gap(&self, no_upper_bound: usize, yes_lower_bound: usize) -> bool {
        no_upper_bound + 1 == self.left && self.right + 1 == yes_lower_bound
    }
}

impl fmt::Display for UnknownSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// The set of spans recorded during one search.
///
/// Spans are disjoint: each is recorded from a probe that lay outside every
/// existing span, and grows only through `Unknown` neighbours, which cannot
/// belong to another span without having been merged into it.
#[derive(Debug, Clone, Default)]
pub struct UnknownSpans {
    spans: Vec<UnknownSpan>,
}

impl UnknownSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly mapped span.
    pub fn record(&mut self, span: UnknownSpan) {
        debug_assert!(
            self.spans
                .iter()
                .all(|s| s.right < span.left || span.right < s.left),
            "span {span} overlaps an existing span"
        );
        self.spans.push(span);
    }

    /// The span containing `index`, if any.
    pub fn containing(&self, index: usize) -> Option<UnknownSpan> {
        self.spans.iter().copied().find(|s| s.contains(index))
    }

    /// Consumes the set, returning spans sorted by position.
    pub fn into_sorted(mut self) -> Vec<UnknownSpan> {
        self.spans.sort_by_key(|s| s.left);
        self.spans
    }
}
