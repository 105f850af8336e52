//! Snapshot-based undo/redo.

use crate::scene::{Scene, SceneSnapshot};
use thiserror::Error;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// History errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to serialize scene: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to restore snapshot: {0}")]
    Restore(#[source] serde_json::Error),
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Undo and redo stacks of scene snapshots.
///
/// The top of the undo stack is always the state the scene is currently in,
/// so a stack of one entry has nothing to revert to.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<SceneSnapshot>,
    redo_stack: Vec<SceneSnapshot>,
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl HistoryManager {
    /// Create an empty history holding at most `limit` undo entries.
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the scene's current state.
    ///
    /// Returns `false` without touching either stack when the state equals
    /// the top of the undo stack.
    pub fn checkpoint(&mut self, scene: &Scene) -> HistoryResult<bool> {
        let snapshot = scene.snapshot().map_err(HistoryError::Serialize)?;
        if self.undo_stack.last() == Some(&snapshot) {
            return Ok(false);
        }

        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        log::debug!("Checkpoint recorded ({} undo entries)", self.undo_stack.len());
        Ok(true)
    }

    /// Revert the scene to the previous state.
    /// Returns `false` if there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> HistoryResult<bool> {
        if self.undo_stack.len() <= 1 {
            log::debug!("No more undo steps");
            return Ok(false);
        }
        let target = &self.undo_stack[self.undo_stack.len() - 2];
        scene.restore(target).map_err(HistoryError::Restore)?;

        if let Some(current) = self.undo_stack.pop() {
            self.redo_stack.push(current);
        }
        Ok(true)
    }

    /// Re-apply the last undone state.
    /// Returns `false` if there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> HistoryResult<bool> {
        let Some(target) = self.redo_stack.last() else {
            return Ok(false);
        };
        scene.restore(target).map_err(HistoryError::Restore)?;

        if let Some(state) = self.redo_stack.pop() {
            self.undo_stack.push(state);
        }
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Snapshot at the top of the undo stack.
    pub fn current(&self) -> Option<&SceneSnapshot> {
        self.undo_stack.last()
    }

    /// Drop all history and re-seed it with the scene's current state.
    pub fn clear(&mut self, scene: &Scene) -> HistoryResult<()> {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.checkpoint(scene)?;
        Ok(())
    }
}
