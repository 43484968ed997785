//! Per-search memo of probe results.

use crate::types::Outcome;

/// Outcomes indexed by candidate position.
///
/// A slot is written at most once. The engine checks it before every probe,
/// so no candidate reaches the oracle twice within one search.
#[derive(Debug, Clone)]
pub struct EvaluationCache {
    slots: Vec<Option<Outcome>>,
}

impl EvaluationCache {
    /// Creates an empty cache for `len` candidates.
    pub fn new(len: usize) -> Self {
        EvaluationCache {
            slots: vec![None; len],
        }
    }

    /// Returns the recorded outcome at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Outcome> {
        self.slots.get(index).copied().flatten()
    }

    /// Records `outcome` at `index` unless the slot is already filled.
    ///
    /// Returns the previously recorded outcome, which is left untouched.
    pub fn insert(&mut self, index: usize, outcome: Outcome) -> Option<Outcome> {
        let slot = &mut self.slots[index];
        if slot.is_none() {
            *slot = Some(outcome);
            None
        } else {
            *slot
        }
    }

    /// Iterates over `(index, outcome)` for every recorded slot.
    pub fn known(&self) -> impl Iterator<Item = (usize, Outcome)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|o| (i, o)))
    }
}
