//! History chain with a bound on resident snapshots
//!
//! Snapshot actions can carry large before/after states. Users rarely undo
//! more than a few steps at a time, so once more than `max_resident` of them
//! hold their snapshots in memory, the oldest are swapped out to records in
//! the swap directory. Undoing or redoing a swapped action reads it back.
//!
//! ```text
//! run(a12), max_resident = 10
//! ┌────────────────────────────────────────────────────┐
//! │ Undo: [a1*, a2, a3, ..., a11, a12]                 │
//! │        ^ oldest resident swapped out (* = on disk) │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. After any `run`, at most `max_resident` undo entries hold snapshots in
//!    memory, unless a swap-out failed (reported in the [`SwapReport`])
//! 2. An entry is in exactly one of the two histories
//! 3. Every swap record belongs to exactly one entry in either history;
//!    entries leaving the chain delete theirs

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::action::{Action, Reversible};
use crate::config::ChainConfig;
use crate::error::{HistoryError, SwapError};
use crate::swap::SwapAgent;

use super::{HistoryChain, SwapReport};

pub struct MemoryBoundedHistoryChain {
    /// Actions available for undo (newest at back)
    undo_stack: Vec<Action>,
    /// Actions available for redo (newest at back)
    redo_stack: Vec<Action>,
    max_resident: usize,
    max_depth: Option<usize>,
    swap_dir: PathBuf,
}

impl fmt::Debug for MemoryBoundedHistoryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBoundedHistoryChain")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("resident", &self.resident_count())
            .field("max_resident", &self.max_resident)
            .field("max_depth", &self.max_depth)
            .field("swap_dir", &self.swap_dir)
            .finish()
    }
}

impl MemoryBoundedHistoryChain {
    pub fn new(max_resident: usize, swap_dir: impl Into<PathBuf>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_resident,
            max_depth: None,
            swap_dir: swap_dir.into(),
        }
    }

    /// Swap to the platform temp directory
    pub fn with_temp_dir(max_resident: usize) -> Self {
        Self::new(max_resident, std::env::temp_dir())
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            ..Self::new(config.max_resident, config.resolved_swap_dir())
        }
    }

    /// Keep at most `depth` undo entries, dropping the oldest
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn swap_dir(&self) -> &Path {
        &self.swap_dir
    }

    pub fn max_resident(&self) -> usize {
        self.max_resident
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo entries currently holding snapshots in memory
    pub fn resident_count(&self) -> usize {
        self.undo_stack.iter().filter(|a| a.is_resident()).count()
    }

    /// Entries in either history with a record on disk
    pub fn swapped_count(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .filter(|a| a.is_swapped())
            .count()
    }

    /// Delete the record of an entry leaving the chain
    fn release(action: Action) -> Result<(), SwapError> {
        match action {
            Action::Swapped(mut agent) => agent.discard_record(),
            _ => Ok(()),
        }
    }

    /// Throw away the redo history, deleting its records
    fn drain_redo(&mut self, report: &mut SwapReport) {
        for action in self.redo_stack.drain(..).rev() {
            if let Err(e) = Self::release(action) {
                warn!(error = %e, "failed to clean up swapped redo action");
                report.failures.push(e);
            }
        }
    }

    /// Drop the oldest undo entries beyond `max_depth`
    fn enforce_depth(&mut self, report: &mut SwapReport) {
        let Some(depth) = self.max_depth else {
            return;
        };
        let excess = self.undo_stack.len().saturating_sub(depth);
        if excess == 0 {
            return;
        }

        for action in self.undo_stack.drain(..excess) {
            if let Err(e) = Self::release(action) {
                warn!(error = %e, "failed to clean up evicted history action");
                report.failures.push(e);
            }
        }
        report.evicted += excess;
    }

    /// Swap out the oldest resident entries until back within budget
    fn swap_if_necessary(&mut self, report: &mut SwapReport) {
        let mut resident = self.resident_count();
        if resident <= self.max_resident {
            return;
        }

        debug!(
            resident,
            max_resident = self.max_resident,
            "too many resident snapshot actions; swapping"
        );

        let entries = std::mem::take(&mut self.undo_stack);
        self.undo_stack.reserve(entries.len());

        for action in entries {
            if resident <= self.max_resident || !action.is_resident() {
                self.undo_stack.push(action);
                continue;
            }

            let mut agent = match action {
                Action::Snapshot(inner) => SwapAgent::new(inner, &self.swap_dir),
                Action::Swapped(agent) => agent,
                plain => {
                    self.undo_stack.push(plain);
                    continue;
                }
            };

            match agent.swap_out() {
                Ok(()) => {
                    resident -= 1;
                    report.swapped_out += 1;
                    self.undo_stack.push(Action::Swapped(agent));
                }
                Err(e) => {
                    warn!(error = %e, "history action failed to swap");
                    report.failures.push(e);
                    let entry = match agent.into_inner() {
                        Ok(inner) => Action::Snapshot(inner),
                        Err(agent) => Action::Swapped(agent),
                    };
                    self.undo_stack.push(entry);
                }
            }
        }
    }
}

impl HistoryChain for MemoryBoundedHistoryChain {
    /// Run and record an action
    ///
    /// A failed run is not recorded and leaves the redo history alone.
    fn run(&mut self, mut action: Action) -> Result<SwapReport, HistoryError> {
        action.run()?;
        self.undo_stack.push(action);

        let mut report = SwapReport::default();
        self.drain_redo(&mut report);
        self.enforce_depth(&mut report);
        self.swap_if_necessary(&mut report);
        Ok(report)
    }

    /// Undo the last action; it moves to the redo history even if undo fails
    fn undo(&mut self) -> Result<(), HistoryError> {
        let mut action = self.undo_stack.pop().ok_or(HistoryError::NothingToUndo)?;
        let result = action.undo();
        self.redo_stack.push(action);

        if let Err(e) = &result {
            warn!(error = %e, "failed to undo history action");
        }
        result
    }

    /// Redo the last undone action; it moves to the undo history even if redo fails
    fn redo(&mut self) -> Result<(), HistoryError> {
        let mut action = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        let result = action.redo();
        self.undo_stack.push(action);

        if let Err(e) = &result {
            warn!(error = %e, "failed to redo history action");
        }
        result
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Empty both histories and delete every swap record
    ///
    /// Both histories end up empty even if a record can't be deleted; the
    /// first such failure is returned.
    fn clear(&mut self) -> Result<(), HistoryError> {
        let mut first_failure = None;

        for action in self.undo_stack.drain(..).chain(self.redo_stack.drain(..)) {
            if let Err(e) = Self::release(action) {
                warn!(error = %e, "failed to clean up swapped history action");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
