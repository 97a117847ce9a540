//! Snapshot-based undo/redo stacks.
//!
//! `History` never looks inside the states it stores; the editor hands it
//! full graph snapshots. With a limit set, the oldest undo entries are
//! evicted first.

use serde::Serialize;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    limit: Option<usize>,
    /// Bumped on every push onto the undo stack.
    generation: u64,
}

impl<T> History<T> {
    pub fn new(limit: Option<usize>) -> Self {
        History { undo: VecDeque::new(), redo: Vec::new(), limit, generation: 0 }
    }

    /// Push the pre-mutation state and drop everything redoable.
    pub fn record(&mut self, before: T) {
        self.push_undo(before);
        self.redo.clear();
    }

    fn push_undo(&mut self, s: T) {
        self.generation += 1;
        self.undo.push_back(s);
        if let Some(limit) = self.limit {
            while self.undo.len() > limit.max(1) {
                self.undo.pop_front();
            }
        }
    }

    /// Trade `current` for the most recent undo entry. `None` (and no change)
    /// when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let prev = self.undo.pop_back()?;
        self.redo.push(current);
        Some(prev)
    }

    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    /// Drop the most recent undo entry, e.g. when a recorded gesture is
    /// abandoned.
    pub fn discard_last(&mut self) -> Option<T> {
        self.undo.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }
    /// Changes whenever an entry is pushed. Lets a caller check that the
    /// entry it recorded is still the newest one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus { can_undo: self.can_undo(), can_redo: self.can_redo() }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
