pub mod bounded;
pub mod simple;


pub use bounded::MemoryBoundedHistoryChain;
pub use simple::SimpleHistoryChain;

use crate::action::{Action, FnAction};
use crate::error::{HistoryError, SwapError};

/// Runs actions and keeps them in undo/redo histories
pub trait HistoryChain {
    /// Run `action` and record it, discarding anything left to redo
    fn run(&mut self, action: Action) -> Result<SwapReport, HistoryError>;

    /// Undo the most recent action
    fn undo(&mut self) -> Result<(), HistoryError>;

    /// Redo the most recently undone action
    fn redo(&mut self) -> Result<(), HistoryError>;

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    /// Forget both histories
    fn clear(&mut self) -> Result<(), HistoryError>;

    /// Run a side effect with history, given the closure that takes it back
    fn run_with_history<F, G>(&mut self, apply: F, revert: G) -> Result<SwapReport, HistoryError>
    where
        F: FnMut() + 'static,
        G: FnMut() + 'static,
        Self: Sized,
    {
        self.run(Action::plain(FnAction::new(apply, revert)))
    }
}

/// What a `run` did to keep memory in bounds
///
/// Swapping is best effort: a record that can't be written leaves its action
/// resident and shows up in `failures` rather than failing the run.
#[derive(Debug, Default)]
pub struct SwapReport {
    /// Actions whose snapshots were moved to disk
    pub swapped_out: usize,
    /// Old entries dropped past the history depth
    pub evicted: usize,
    /// Swap-out and record cleanup failures
    pub failures: Vec<SwapError>,
}

impl SwapReport {
    /// True if some swap or cleanup did not happen
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}
