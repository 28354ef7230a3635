//! Undo/redo over project snapshots.
//!
//! Every accepted mutation produces a new [`Project`], so history is simply
//! the list of snapshots that were replaced. Rejected operations never reach
//! the history.

use crate::constants::MAX_UNDO_HISTORY;
use crate::project::Project;
use serde::{Deserialize, Serialize};

/// Manages undo/redo history for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndoHistory {
    /// Snapshots that can be restored by undo, oldest first
    #[serde(skip)]
    undo_stack: Vec<Project>,
    /// Snapshots that can be restored by redo
    #[serde(skip)]
    redo_stack: Vec<Project>,
}

impl UndoHistory {
    /// Creates a new empty undo history.
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Records the snapshot that a new commit is replacing.
    ///
    /// This clears the redo stack since a new commit invalidates any previously undone ones.
    pub fn record(&mut self, previous: Project) {
        self.undo_stack.push(previous);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Returns true if there are snapshots that can be restored by undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are snapshots that can be restored by redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Steps back one snapshot.
    ///
    /// # Arguments
    ///
    /// * `current` - The snapshot being left; it becomes redoable
    ///
    /// # Returns
    ///
    /// The snapshot to restore, or None if there is nothing to undo
    pub fn undo(&mut self, current: &Project) -> Option<Project> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Steps forward one snapshot, the inverse of [`UndoHistory::undo`].
    pub fn redo(&mut self, current: &Project) -> Option<Project> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(next)
    }
}
