use std::collections::VecDeque;

use crate::constants::MAX_UNDO_ENTRIES;

/// Snapshot undo/redo stack over an opaque, cloneable value.
#[derive(Clone, Debug)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    limit: usize,
    skip_next: bool,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::with_limit(MAX_UNDO_ENTRIES)
    }
}

impl<T: Clone> History<T> {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
            skip_next: false,
        }
    }

    /// Records `snapshot` as the state to return to and drops the redo
    /// branch. The capture right after an undo or redo is swallowed so the
    /// restore itself is not recorded.
    pub fn capture(&mut self, snapshot: &T) {
        if self.skip_next {
            self.skip_next = false;
            return;
        }
        self.undo.push_back(snapshot.clone());
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    pub fn undo(&mut self, current: &T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.clone());
        self.skip_next = true;
        Some(previous)
    }

    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current.clone());
        self.skip_next = true;
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.skip_next = false;
    }
}
