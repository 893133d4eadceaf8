use crate::action::{Action, Reversible};
use crate::error::HistoryError;

use super::{HistoryChain, SwapReport};

/// Manages undo/redo history entirely in memory
#[derive(Debug, Default)]
pub struct SimpleHistoryChain {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl SimpleHistoryChain {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

impl HistoryChain for SimpleHistoryChain {
    /// Run and record an action (clears redo stack)
    fn run(&mut self, mut action: Action) -> Result<SwapReport, HistoryError> {
        action.run()?;
        self.undo_stack.push(action);
        self.redo_stack.clear();
        Ok(SwapReport::default())
    }

    /// Undo the last action; it moves to the redo stack even if undo fails
    fn undo(&mut self) -> Result<(), HistoryError> {
        let mut action = self.undo_stack.pop().ok_or(HistoryError::NothingToUndo)?;
        let result = action.undo();
        self.redo_stack.push(action);
        result
    }

    /// Redo the last undone action; it moves to the undo stack even if redo fails
    fn redo(&mut self) -> Result<(), HistoryError> {
        let mut action = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        let result = action.redo();
        self.undo_stack.push(action);
        result
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }
}
