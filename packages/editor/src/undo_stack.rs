//! # Undo/Redo Stack
//!
//! Tracks scene history as whole-tree snapshots.
//!
//! ## Design
//!
//! - `current` is the snapshot of the live tree
//! - Committing pushes `current` to the undo stack and makes the new snapshot current
//! - Undo moves `current` to the redo stack and pops the undo stack into `current`
//! - Redo mirrors undo
//! - New commits clear the redo stack
//! - Snapshots are deep copies, so restoring one is exact
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! stack.commit(Snapshot::capture(&root, 0, None));
//!
//! mutation.apply(&mut root, &resolver)?;
//! stack.commit(Snapshot::capture(&root, 1, Some(mutation.label())));
//!
//! if let Some(previous) = stack.undo() {
//!     root = previous.root.clone();
//! }
//! ```

use scenecraft_model::RootNode;

/// Default number of undo levels
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// A full copy of the scene at one point in history
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub root: RootNode,
    pub version: u64,
    /// Edit that produced this state
    pub label: Option<String>,
}

impl Snapshot {
    pub fn capture(root: &RootNode, version: u64, label: Option<&str>) -> Self {
        Self {
            root: root.clone(),
            version,
            label: label.map(str::to_string),
        }
    }
}

/// Undo/redo stack for scene editing
#[derive(Debug)]
pub struct UndoStack {
    /// Earlier states (most recent last)
    past: Vec<Snapshot>,

    /// Undone states (most recent last)
    future: Vec<Snapshot>,

    /// State of the live tree
    current: Option<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            current: None,
            max_levels,
        }
    }

    /// Record a new state of the live tree
    pub fn commit(&mut self, next: Snapshot) {
        if let Some(current) = self.current.replace(next) {
            self.past.push(current);
        }

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.past.len() > self.max_levels {
            let overflow = self.past.len() - self.max_levels;
            self.past.drain(..overflow);
        }

        // New action invalidates future
        self.future.clear();
    }

    /// Step back, returning the snapshot to restore
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let previous = self.past.pop()?;
        if let Some(current) = self.current.replace(previous) {
            self.future.push(current);
        }
        self.current.as_ref()
    }

    /// Step forward, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.future.pop()?;
        if let Some(current) = self.current.replace(next) {
            self.past.push(current);
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Drop all history and start over from `current`
    pub fn reset(&mut self, current: Snapshot) {
        self.clear();
        self.current = Some(current);
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.current = None;
    }

    /// Label of the edit the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.current.as_ref().and_then(|s| s.label.as_deref())
    }

    /// Label of the edit the next redo reapplies
    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().and_then(|s| s.label.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(width: f64, version: u64, label: Option<&str>) -> Snapshot {
        Snapshot::capture(&RootNode::new(width, 100.0), version, label)
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.max_levels(), 100);
        assert!(stack.current().is_none());
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_first_commit_is_not_undoable() {
        let mut stack = UndoStack::new();
        stack.commit(snapshot(1.0, 0, None));
        assert!(!stack.can_undo());
        assert!(stack.undo().is_none());
        assert_eq!(stack.current().map(|s| s.version), Some(0));
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut stack = UndoStack::new();
        stack.commit(snapshot(1.0, 0, None));
        stack.commit(snapshot(2.0, 1, Some("resize")));

        assert!(stack.can_undo());
        assert_eq!(stack.undo_label(), Some("resize"));

        let restored = stack.undo().cloned().unwrap();
        assert_eq!(restored, snapshot(1.0, 0, None));
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 1);
        assert_eq!(stack.undo_label(), None);
        assert_eq!(stack.redo_label(), Some("resize"));

        let redone = stack.redo().cloned().unwrap();
        assert_eq!(redone, snapshot(2.0, 1, Some("resize")));
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_new_commit_clears_redo() {
        let mut stack = UndoStack::new();
        stack.commit(snapshot(1.0, 0, None));
        stack.commit(snapshot(2.0, 1, Some("a")));
        stack.undo();
        assert_eq!(stack.redo_levels(), 1);

        stack.commit(snapshot(3.0, 2, Some("b")));
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.undo_label(), Some("b"));
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        for i in 0..4 {
            stack.commit(snapshot(i as f64, i, Some("edit")));
        }

        assert_eq!(stack.undo_levels(), 2);
        stack.undo();
        let oldest = stack.undo().map(|s| s.version);
        assert_eq!(oldest, Some(1));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_reset_keeps_only_current() {
        let mut stack = UndoStack::new();
        stack.commit(snapshot(1.0, 0, None));
        stack.commit(snapshot(1.0, 1, Some("a")));
        stack.undo();

        stack.reset(snapshot(5.0, 7, None));
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.current().map(|s| s.version), Some(7));
    }
}
