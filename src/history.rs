//! Undo/redo history for the raw-text editor.
//!
//! Snapshots of the buffer are kept on two bounded stacks. Continuous
//! typing is sampled (one snapshot every `save_frequency` calls to
//! [`History::save`]) while structural edits go through
//! [`History::force_save`] so each one can be undone on its own.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Edits per automatic snapshot used by the editor.
pub const DEFAULT_SAVE_FREQUENCY: usize = 4;

/// Entries kept per stack by default.
pub const DEFAULT_CAPACITY: usize = 200;

/// Buffer text and selection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub text: String,
    /// Selection start (char offset).
    pub start: usize,
    /// Selection end (char offset).
    pub end: usize,
}

impl Snapshot {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Which stack an operation read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOp {
    Undo,
    Redo,
}

impl fmt::Display for HistoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to {0}")]
    EmptyHistory(HistoryOp),
}

/// Throttled, capacity-bounded undo and redo stacks.
///
/// Both stacks push and pop at the back; once a stack grows past
/// `capacity` its oldest entry (the front) is dropped.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    save_frequency: usize,
    capacity: usize,
    counter: usize,
}

impl History {
    /// Create a history. Zero parameters are raised to 1.
    pub fn new(save_frequency: usize, capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            save_frequency: save_frequency.max(1),
            capacity: capacity.max(1),
            counter: 0,
        }
    }

    pub const fn save_frequency(&self) -> usize {
        self.save_frequency
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
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

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent undo entry.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.undo.back()
    }

    /// Record `entry` if this call completes a `save_frequency` cycle.
    ///
    /// Returns `true` when the entry reached [`History::force_save`].
    pub fn save(&mut self, entry: Snapshot) -> bool {
        self.counter += 1;
        if self.counter < self.save_frequency {
            trace!(counter = self.counter, "history save throttled");
            return false;
        }
        self.counter = 0;
        self.force_save(entry);
        true
    }

    /// Record `entry` unless it equals the most recent undo entry.
    ///
    /// A recorded entry starts a new branch of history, so the redo stack
    /// is cleared.
    pub fn force_save(&mut self, entry: Snapshot) {
        if self.undo.back() == Some(&entry) {
            trace!("history entry unchanged, skipped");
            return;
        }
        if !self.redo.is_empty() {
            debug!(dropped = self.redo.len(), "clearing redo history");
            self.redo.clear();
        }
        self.undo.push_back(entry);
        truncate(&mut self.undo, self.capacity);
    }

    /// Move the most recent undo entry to the redo stack and return it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::EmptyHistory`] when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Snapshot, HistoryError> {
        let entry = self
            .undo
            .pop_back()
            .ok_or(HistoryError::EmptyHistory(HistoryOp::Undo))?;
        self.redo.push_back(entry.clone());
        truncate(&mut self.redo, self.capacity);
        Ok(entry)
    }

    /// Move the most recent redo entry back to the undo stack and return it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::EmptyHistory`] when there is nothing to redo.
    pub fn redo(&mut self) -> Result<Snapshot, HistoryError> {
        let entry = self
            .redo
            .pop_back()
            .ok_or(HistoryError::EmptyHistory(HistoryOp::Redo))?;
        self.undo.push_back(entry.clone());
        truncate(&mut self.undo, self.capacity);
        Ok(entry)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_FREQUENCY, DEFAULT_CAPACITY)
    }
}

fn truncate(stack: &mut VecDeque<Snapshot>, capacity: usize) {
    if stack.len() > capacity {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> Snapshot {
        Snapshot::new(text, text.len(), text.len())
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = History::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.save_frequency(), DEFAULT_SAVE_FREQUENCY);
        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_zero_parameters_are_clamped() {
        let history = History::new(0, 0);
        assert_eq!(history.save_frequency(), 1);
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn test_save_is_throttled() {
        let mut history = History::new(4, 10);
        assert!(!history.save(snap("a")));
        assert!(!history.save(snap("ab")));
        assert!(!history.save(snap("abc")));
        assert_eq!(history.undo_len(), 0);

        assert!(history.save(snap("abcd")));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.latest(), Some(&snap("abcd")));
    }

    #[test]
    fn test_save_counter_resets_after_store() {
        let mut history = History::new(2, 10);
        for i in 0..6 {
            history.save(snap(&"x".repeat(i + 1)));
        }
        assert_eq!(history.undo_len(), 3);
    }

    #[test]
    fn test_save_frequency_one_stores_every_call() {
        let mut history = History::new(1, 10);
        history.save(snap("a"));
        history.save(snap("b"));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_force_save_bypasses_throttle() {
        let mut history = History::new(4, 10);
        history.force_save(snap("a"));
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_force_save_skips_duplicate_top() {
        let mut history = History::new(1, 10);
        history.force_save(snap("a"));
        history.force_save(snap("a"));
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_force_save_same_text_different_selection_is_kept() {
        let mut history = History::new(1, 10);
        history.force_save(Snapshot::new("a", 0, 0));
        history.force_save(Snapshot::new("a", 1, 1));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(1, 2);
        history.force_save(snap("1"));
        history.force_save(snap("2"));
        history.force_save(snap("3"));
        assert_eq!(history.undo_len(), 2);

        assert_eq!(history.undo().unwrap(), snap("3"));
        assert_eq!(history.undo().unwrap(), snap("2"));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_empty_fails() {
        let mut history = History::default();
        assert_eq!(
            history.undo(),
            Err(HistoryError::EmptyHistory(HistoryOp::Undo))
        );
    }

    #[test]
    fn test_redo_after_fresh_save_fails() {
        let mut history = History::default();
        history.force_save(snap("a"));
        assert_eq!(
            history.redo(),
            Err(HistoryError::EmptyHistory(HistoryOp::Redo))
        );
    }

    #[test]
    fn test_undo_then_redo_moves_entry_between_stacks() {
        let mut history = History::new(1, 10);
        history.force_save(snap("a"));
        history.force_save(snap("ab"));

        assert_eq!(history.undo().unwrap(), snap("ab"));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 1);

        assert_eq!(history.redo().unwrap(), snap("ab"));
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_new_entry_clears_redo() {
        let mut history = History::new(1, 10);
        history.force_save(snap("a"));
        history.force_save(snap("ab"));
        history.undo().unwrap();
        assert!(history.can_redo());

        history.force_save(snap("ac"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_throttled_call_does_not_clear_redo() {
        let mut history = History::new(3, 10);
        history.force_save(snap("a"));
        history.undo().unwrap();
        history.save(snap("b"));
        assert!(history.can_redo());
    }

    #[test]
    fn test_redo_stack_respects_capacity() {
        let mut history = History::new(1, 2);
        history.force_save(snap("1"));
        history.force_save(snap("2"));
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.redo_len(), 2);
        assert_eq!(history.redo().unwrap(), snap("1"));
    }

    #[test]
    fn test_error_message() {
        let err = HistoryError::EmptyHistory(HistoryOp::Redo);
        assert_eq!(err.to_string(), "nothing to redo");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Save(u8),
            ForceSave(u8),
            Undo,
            Redo,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<u8>().prop_map(Op::Save),
                any::<u8>().prop_map(Op::ForceSave),
                Just(Op::Undo),
                Just(Op::Redo),
            ]
        }

        proptest! {
            #[test]
            fn stacks_never_exceed_capacity(
                capacity in 1..8usize,
                frequency in 1..5usize,
                ops in prop::collection::vec(op(), 0..200),
            ) {
                let mut history = History::new(frequency, capacity);
                for op in ops {
                    match op {
                        Op::Save(n) => { history.save(snap(&n.to_string())); }
                        Op::ForceSave(n) => history.force_save(snap(&n.to_string())),
                        Op::Undo => { let _ = history.undo(); }
                        Op::Redo => { let _ = history.redo(); }
                    }
                    prop_assert!(history.undo_len() <= capacity);
                    prop_assert!(history.redo_len() <= capacity);
                }
            }

            #[test]
            fn undo_fails_exactly_when_empty(ops in prop::collection::vec(op(), 0..100)) {
                let mut history = History::new(1, 4);
                for op in ops {
                    match op {
                        Op::Save(n) | Op::ForceSave(n) => history.force_save(snap(&n.to_string())),
                        Op::Undo => {
                            let could = history.can_undo();
                            prop_assert_eq!(history.undo().is_ok(), could);
                        }
                        Op::Redo => {
                            let could = history.can_redo();
                            prop_assert_eq!(history.redo().is_ok(), could);
                        }
                    }
                }
            }
        }
    }
}
