//! Boundary search over an ordered candidate sequence.
//!
//! Finds the first candidate that shows the new behavior, given that the
//! first candidate shows the old behavior, the last shows the new one, and the
//! behavior flips exactly once in between. Probing is plain bisection until a
//! candidate turns out to be untestable. The engine then maps the whole run of
//! untestable neighbours once, records it as an [`UnknownSpan`], and from then
//! on steers around it by probing just outside its edges.
//!
//! Every outcome is cached, so no candidate reaches the oracle twice. When the
//! only candidates left between the two bounds form a single unknown span the
//! search stops and reports a [`Verdict::Ambiguous`] boundary: the regression
//! is either the reported candidate or one of the untestable ones before it.

pub mod cache;
pub mod frontier;
pub mod progress;
pub mod span;

#[cfg(test)]
mod engine_tests;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::Oracle;
use crate::types::Outcome;

pub use cache::EvaluationCache;
pub use frontier::Frontier;
pub use progress::ProgressHint;
pub use span::{UnknownSpan, UnknownSpans};

/// Errors that stop a search.
///
/// All but `MonotonicityViolation` are detected before the first probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Fewer than two candidates: there is no boundary to find.
    #[error("need at least two candidates to bisect, got {0}")]
    TooFewCandidates(usize),

    /// The first candidate is known not to show the old behavior.
    #[error("first candidate must show the old behavior, but it is known to be {0}")]
    FirstCandidateNotOld(Outcome),

    /// The last candidate is known not to show the new behavior.
    #[error("last candidate must show the new behavior, but it is known to be {0}")]
    LastCandidateNotNew(Outcome),

    /// An assumed outcome referred to a position outside the sequence.
    #[error("candidate index {index} is out of range for {len} candidates")]
    IndexOutOfRange { index: usize, len: usize },

    /// An assumed outcome contradicts one already recorded for that position.
    #[error("candidate {index} is already known to be {existing}")]
    AlreadyKnown { index: usize, existing: Outcome },

    /// A candidate shows the new behavior before one that shows the old.
    #[error(
        "outcomes are not monotonic: candidate {new_at} shows the new behavior \
         but later candidate {old_at} shows the old"
    )]
    MonotonicityViolation { new_at: usize, old_at: usize },
}

/// How certain the reported boundary is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// The previous candidate was confirmed old: the boundary is exact.
    Confirmed,

    /// Every candidate between the last confirmed-old one and the boundary is
    /// untestable. The regression may be anywhere in `span` or the boundary.
    Ambiguous { span: UnknownSpan },
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bisection {
    /// Index of the first candidate known to show the new behavior.
    pub index: usize,

    pub verdict: Verdict,

    /// Every unknown span mapped during the search, in position order.
    pub unknown_spans: Vec<UnknownSpan>,

    /// Number of oracle calls made.
    pub evaluations: usize,
}

impl Bisection {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.verdict, Verdict::Confirmed)
    }

    /// Positions that may hold the regression: just `index` when confirmed,
    /// otherwise the ambiguous span followed by `index`.
    pub fn suspects(&self) -> RangeInclusive<usize> {
        match self.verdict {
            Verdict::Confirmed => self.index..=self.index,
            Verdict::Ambiguous { span } => span.left..=self.index,
        }
    }
}

/// A single search over `candidates`.
///
/// Use [`least_satisfying`] unless some outcomes are already known; those can
/// be recorded with [`assume`](Self::assume) so they are never re-evaluated.
#[derive(Debug)]
pub struct Bisector<'a, C> {
    candidates: &'a [C],
    cache: EvaluationCache,
    spans: UnknownSpans,
    evaluations: usize,
}

impl<'a, C> Bisector<'a, C> {
    pub fn new(candidates: &'a [C]) -> Self {
        Bisector {
            candidates,
            cache: EvaluationCache::new(candidates.len()),
            spans: UnknownSpans::new(),
            evaluations: 0,
        }
    }

    /// Records a known outcome for the candidate at `index`.
    ///
    /// Repeating an identical assumption is a no-op.
    pub fn assume(&mut self, index: usize, outcome: Outcome) -> Result<(), SearchError> {
        let len = self.candidates.len();
        if index >= len {
            return Err(SearchError::IndexOutOfRange { index, len });
        }
        match self.cache.insert(index, outcome) {
            Some(existing) if existing != outcome => {
                Err(SearchError::AlreadyKnown { index, existing })
            }
            _ => Ok(()),
        }
    }

    /// Runs the search to completion.
    pub async fn run<O>(mut self, oracle: &mut O) -> Result<Bisection, SearchError>
    where
        O: Oracle<C>,
    {
        let mut frontier = self.initial_frontier()?;
        tracing::debug!(
            candidates = self.candidates.len(),
            no_upper_bound = frontier.no_upper_bound,
            yes_lower_bound = frontier.yes_lower_bound,
            "starting bisection"
        );

        loop {
            if frontier.is_pinned() {
                return Ok(self.finish(frontier.yes_lower_bound, Verdict::Confirmed));
            }

            let next = match self.select(&frontier) {
                Ok(next) => next,
                Err(span) => {
                    tracing::warn!(
                        left = span.left,
                        right = span.right,
                        boundary = frontier.yes_lower_bound,
                        "only untestable candidates remain; boundary is ambiguous"
                    );
                    let boundary = frontier.yes_lower_bound;
                    return Ok(self.finish(boundary, Verdict::Ambiguous { span }));
                }
            };

            let outcome = self.outcome_at(next, &frontier, oracle).await;
            if outcome == Outcome::Unknown {
                let span = self.map_unknown_span(next, &frontier, oracle).await;
                tracing::info!(
                    left = span.left,
                    right = span.right,
                    len = span.len(),
                    "skipping untestable candidates"
                );
                self.spans.record(span);

                // Mapping stopped at known neighbours; they bound the
                // regression just like a direct probe would.
                let neighbours: Vec<(usize, Outcome)> = [span.left - 1, span.right + 1]
                    .into_iter()
                    .filter_map(|index| self.cache.get(index).map(|o| (index, o)))
                    .collect();
                for (index, outcome) in neighbours {
                    frontier.observe(index, outcome)?;
                }
            } else {
                frontier.observe(next, outcome)?;
            }
        }
    }

    /// Checks the preconditions and derives the starting bounds.
    fn initial_frontier(&self) -> Result<Frontier, SearchError> {
        let len = self.candidates.len();
        if len < 2 {
            return Err(SearchError::TooFewCandidates(len));
        }
        if let Some(first) = self.cache.get(0).filter(|o| *o != Outcome::DoesNotSatisfy) {
            return Err(SearchError::FirstCandidateNotOld(first));
        }
        if let Some(last) = self.cache.get(len - 1).filter(|o| *o != Outcome::Satisfies) {
            return Err(SearchError::LastCandidateNotNew(last));
        }
        Frontier::from_known(len, self.cache.known())
    }

    /// Picks the next position to probe.
    ///
    /// Returns the blocking span when the midpoint is inside a span that
    /// fills the whole gap, leaving nothing to probe.
    fn select(&self, frontier: &Frontier) -> Result<usize, UnknownSpan> {
        let mid = frontier.midpoint();
        match self.spans.containing(mid) {
            None => Ok(mid),
            Some(span) if span.left > frontier.no_upper_bound + 1 => Ok(span.left - 1),
            Some(span) if span.right + 1 < frontier.yes_lower_bound => Ok(span.right + 1),
            Some(span) => {
                debug_assert!(
                    span.fills_gap(frontier.no_upper_bound, frontier.yes_lower_bound)
                );
                Err(span)
            }
        }
    }

    /// Returns the outcome at `index`, asking the oracle only on a cache miss.
    async fn outcome_at<O>(
        &mut self,
        index: usize,
        frontier: &Frontier,
        oracle: &mut O,
    ) -> Outcome
    where
        O: Oracle<C>,
    {
        if let Some(outcome) = self.cache.get(index) {
            tracing::trace!(index, %outcome, "cached outcome");
            return outcome;
        }

        let hint = ProgressHint::between(frontier.no_upper_bound, frontier.yes_lower_bound);
        let outcome = oracle.evaluate(&self.candidates[index], hint).await;
        self.evaluations += 1;
        self.cache.insert(index, outcome);
        tracing::debug!(index, %outcome, "evaluated candidate");
        outcome
    }

    /// Grows a span outward from the untestable candidate at `origin` until
    /// either side meets a testable candidate or a bound.
    async fn map_unknown_span<O>(
        &mut self,
        origin: usize,
        frontier: &Frontier,
        oracle: &mut O,
    ) -> UnknownSpan
    where
        O: Oracle<C>,
    {
        let mut left = origin;
        while frontier.contains(left - 1)
            && self.outcome_at(left - 1, frontier, oracle).await == Outcome::Unknown
        {
            left -= 1;
        }

        let mut right = origin;
        while frontier.contains(right + 1)
            && self.outcome_at(right + 1, frontier, oracle).await == Outcome::Unknown
        {
            right += 1;
        }

        UnknownSpan::new(left, right)
    }

    fn finish(self, index: usize, verdict: Verdict) -> Bisection {
        tracing::debug!(index, evaluations = self.evaluations, "bisection finished");
        Bisection {
            index,
            verdict,
            unknown_spans: self.spans.into_sorted(),
            evaluations: self.evaluations,
        }
    }
}

/// Finds the first candidate for which `oracle` reports the new behavior.
///
/// `candidates` must be ordered oldest first, hold at least two entries,
/// start with a candidate showing the old behavior and end with one showing
/// the new behavior. Neither endpoint is evaluated.
pub async fn least_satisfying<C, O>(
    candidates: &[C],
    oracle: &mut O,
) -> Result<Bisection, SearchError>
where
    O: Oracle<C>,
{
    Bisector::new(candidates).run(oracle).await
}
