//! Bounded snapshot-based undo/redo history for the stroke collection.

use crate::stroke::{Stroke, StrokeCollection};
use std::collections::VecDeque;

/// Maximum number of undo states to keep by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;
/// Largest undo depth a configuration may ask for.
pub const MAX_HISTORY_CAPACITY: usize = 1000;

/// An independent deep copy of a stroke collection.
///
/// Once pushed onto a history stack a snapshot is owned by that stack alone.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    strokes: Vec<Stroke>,
}

impl HistorySnapshot {
    /// Take a snapshot of a collection.
    pub fn capture(collection: &StrokeCollection) -> Self {
        Self {
            strokes: collection.strokes().to_vec(),
        }
    }

    /// Number of strokes captured.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    fn restore(self) -> StrokeCollection {
        StrokeCollection::from(self.strokes)
    }
}

/// Undo/redo stacks of collection snapshots, most recent at the front.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<HistorySnapshot>,
    redo_stack: VecDeque<HistorySnapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history keeping at most `capacity` undo states.
    ///
    /// The capacity is raised to at least one. Stacks grow on demand.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record the state of `collection` before a change is applied to it.
    ///
    /// Evicts the oldest state past capacity and invalidates the redo path.
    pub fn push_snapshot(&mut self, collection: &StrokeCollection) {
        self.push_undo(HistorySnapshot::capture(collection));
        self.redo_stack.clear();
    }

    /// Restore the most recent undo state into `collection`.
    ///
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, collection: &mut StrokeCollection) -> bool {
        let Some(snapshot) = self.undo_stack.pop_front() else {
            return false;
        };
        self.redo_stack.push_front(HistorySnapshot::capture(collection));
        *collection = snapshot.restore();
        true
    }

    /// Restore the most recently undone state into `collection`.
    ///
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, collection: &mut StrokeCollection) -> bool {
        let Some(snapshot) = self.redo_stack.pop_front() else {
            return false;
        };
        self.push_undo(HistorySnapshot::capture(collection));
        *collection = snapshot.restore();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of states that can be undone.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of states that can be redone.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    fn push_undo(&mut self, snapshot: HistorySnapshot) {
        self.undo_stack.push_front(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_back();
        }
    }
}
