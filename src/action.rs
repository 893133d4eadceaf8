use std::fmt;

use crate::error::HistoryError;
use crate::snapshot::{Memento, SnapshotAction};
use crate::swap::SwapAgent;

/// A unit of work that can undo and redo itself
pub trait Reversible {
    fn run(&mut self) -> Result<(), HistoryError>;

    fn undo(&mut self) -> Result<(), HistoryError>;

    fn redo(&mut self) -> Result<(), HistoryError>;
}

/// An entry in a history chain
///
/// Snapshot-carrying actions are kept as their own variants so a chain can
/// tell which entries hold memory worth swapping out.
pub enum Action {
    /// Any caller-defined reversible action
    Plain(Box<dyn Reversible>),
    /// Action holding before/after snapshots in memory
    Snapshot(SnapshotAction),
    /// Snapshot action wrapped for swapping to disk
    Swapped(SwapAgent),
}

impl Action {
    pub fn plain(action: impl Reversible + 'static) -> Self {
        Action::Plain(Box::new(action))
    }

    pub fn snapshot(memento: impl Memento + 'static) -> Self {
        Action::Snapshot(SnapshotAction::new(memento))
    }

    /// True if this entry currently holds a snapshot pair in memory
    pub fn is_resident(&self) -> bool {
        match self {
            Action::Plain(_) => false,
            Action::Snapshot(action) => action.is_resident(),
            Action::Swapped(agent) => agent.is_resident(),
        }
    }

    /// True if this entry has an outstanding swap record on disk
    pub fn is_swapped(&self) -> bool {
        matches!(self, Action::Swapped(agent) if agent.is_swapped())
    }
}

impl Reversible for Action {
    fn run(&mut self) -> Result<(), HistoryError> {
        match self {
            Action::Plain(action) => action.run(),
            Action::Snapshot(action) => action.run(),
            Action::Swapped(agent) => agent.run(),
        }
    }

    fn undo(&mut self) -> Result<(), HistoryError> {
        match self {
            Action::Plain(action) => action.undo(),
            Action::Snapshot(action) => action.undo(),
            Action::Swapped(agent) => agent.undo(),
        }
    }

    fn redo(&mut self) -> Result<(), HistoryError> {
        match self {
            Action::Plain(action) => action.redo(),
            Action::Snapshot(action) => action.redo(),
            Action::Swapped(agent) => agent.redo(),
        }
    }
}

impl From<SnapshotAction> for Action {
    fn from(action: SnapshotAction) -> Self {
        Action::Snapshot(action)
    }
}

impl From<SwapAgent> for Action {
    fn from(agent: SwapAgent) -> Self {
        Action::Swapped(agent)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Plain(_) => f.write_str("Plain"),
            Action::Snapshot(action) => f.debug_tuple("Snapshot").field(action).finish(),
            Action::Swapped(agent) => f.debug_tuple("Swapped").field(agent).finish(),
        }
    }
}

/// Plain action built from a pair of closures
///
/// `apply` performs the work (and is re-run on redo), `revert` takes it back.
pub struct FnAction<F, G> {
    apply: F,
    revert: G,
}

impl<F, G> FnAction<F, G>
where
    F: FnMut(),
    G: FnMut(),
{
    pub fn new(apply: F, revert: G) -> Self {
        Self { apply, revert }
    }
}

impl<F, G> Reversible for FnAction<F, G>
where
    F: FnMut(),
    G: FnMut(),
{
    fn run(&mut self) -> Result<(), HistoryError> {
        (self.apply)();
        Ok(())
    }

    fn undo(&mut self) -> Result<(), HistoryError> {
        (self.revert)();
        Ok(())
    }

    fn redo(&mut self) -> Result<(), HistoryError> {
        (self.apply)();
        Ok(())
    }
}
