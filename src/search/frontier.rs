//! The two confirmed bounds that bracket the regression.

use crate::types::Outcome;

use super::SearchError;

/// `no_upper_bound` is the largest index known to show the old behavior and
/// `yes_lower_bound` the smallest known to show the new one. The regression
/// lies in `(no_upper_bound, yes_lower_bound]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontier {
    pub no_upper_bound: usize,
    pub yes_lower_bound: usize,
}

impl Frontier {
    /// Derives the frontier from every known outcome.
    ///
    /// Position 0 is old and position `len - 1` new by precondition; known
    /// outcomes can only tighten the bounds. A `Satisfies` that precedes a
    /// `DoesNotSatisfy` is rejected.
    pub fn from_known(
        len: usize,
        known: impl IntoIterator<Item = (usize, Outcome)>,
    ) -> Result<Self, SearchError> {
        let mut frontier = Frontier {
            no_upper_bound: 0,
            yes_lower_bound: len - 1,
        };
        for (index, outcome) in known {
            match outcome {
                Outcome::DoesNotSatisfy => {
                    frontier.no_upper_bound = frontier.no_upper_bound.max(index);
                }
                Outcome::Satisfies => {
                    frontier.yes_lower_bound = frontier.yes_lower_bound.min(index);
                }
                Outcome::Unknown => {}
            }
        }
        if frontier.no_upper_bound >= frontier.yes_lower_bound {
            return Err(SearchError::MonotonicityViolation {
                new_at: frontier.yes_lower_bound,
                old_at: frontier.no_upper_bound,
            });
        }
        Ok(frontier)
    }

    /// True once the bounds are adjacent and the regression is pinned.
    pub fn is_pinned(&self) -> bool {
        self.no_upper_bound + 1 == self.yes_lower_bound
    }

    /// The plain bisection point. Strictly inside the bounds unless pinned.
    pub fn midpoint(&self) -> usize {
        self.no_upper_bound + (self.yes_lower_bound - self.no_upper_bound) / 2
    }

    /// Returns true if `index` lies strictly between the bounds.
    pub fn contains(&self, index: usize) -> bool {
        self.no_upper_bound < index && index < self.yes_lower_bound
    }

    /// Moves a bound to `index` according to `outcome`.
    ///
    /// `Unknown` never moves a bound. A verdict that lands on the wrong side of
    /// the opposite bound contradicts monotonicity.
    pub fn observe(&mut self, index: usize, outcome: Outcome) -> Result<(), SearchError> {
        match outcome {
            Outcome::Satisfies if index <= self.no_upper_bound => {
                Err(SearchError::MonotonicityViolation {
                    new_at: index,
                    old_at: self.no_upper_bound,
                })
            }
            Outcome::DoesNotSatisfy if index >= self.yes_lower_bound => {
                Err(SearchError::MonotonicityViolation {
                    new_at: self.yes_lower_bound,
                    old_at: index,
                })
            }
            Outcome::Satisfies => {
                self.yes_lower_bound = self.yes_lower_bound.min(index);
                Ok(())
            }
            Outcome::DoesNotSatisfy => {
                self.no_upper_bound = self.no_upper_bound.max(index);
                Ok(())
            }
            Outcome::Unknown => Ok(()),
        }
    }
}
