//! Actions that record before/after snapshots of external state
//!
//! The caller supplies a [`Memento`]: the effect itself plus a way to capture
//! and restore the state it touches as opaque bytes. [`SnapshotAction`] runs
//! the effect between two captures and undoes/redoes by restoring them.
//!
//! # Example
//! ```ignore
//! struct Shuffle { data: Rc<RefCell<Vec<i32>>> }
//!
//! impl Memento for Shuffle {
//!     fn apply(&mut self) -> Result<(), ActionError> { /* shuffle */ Ok(()) }
//!     fn capture_state(&self) -> io::Result<Vec<u8>> { /* encode data */ }
//!     fn restore_state(&mut self, state: &[u8]) -> io::Result<()> { /* decode data */ }
//! }
//!
//! chain.run(Action::snapshot(Shuffle { data }))?;
//! ```

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::action::Reversible;
use crate::error::{ActionError, HistoryError};

/// Caller-supplied effect and state capture for a [`SnapshotAction`]
pub trait Memento {
    /// Perform the action's effect
    fn apply(&mut self) -> Result<(), ActionError>;

    /// Serialize the current external state
    fn capture_state(&self) -> io::Result<Vec<u8>>;

    /// Put external state back to a previously captured snapshot
    fn restore_state(&mut self, state: &[u8]) -> io::Result<()>;
}

/// State captured before and after an action ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPair {
    pub before: Vec<u8>,
    pub after: Vec<u8>,
}

impl SnapshotPair {
    /// Total payload size in bytes
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reversible action that undoes/redoes by restoring snapshots
pub struct SnapshotAction {
    memento: Box<dyn Memento>,
    /// `None` before the first run and while externalized
    snapshots: Option<SnapshotPair>,
}

impl SnapshotAction {
    pub fn new(memento: impl Memento + 'static) -> Self {
        Self {
            memento: Box::new(memento),
            snapshots: None,
        }
    }

    /// True if both snapshots are held in memory
    pub fn is_resident(&self) -> bool {
        self.snapshots.is_some()
    }

    pub fn snapshots(&self) -> Option<&SnapshotPair> {
        self.snapshots.as_ref()
    }

    /// Hand the snapshot pair over to the caller, leaving none resident
    pub fn externalize(&mut self) -> Option<SnapshotPair> {
        self.snapshots.take()
    }

    /// Take back a pair previously handed out by [`Self::externalize`]
    pub fn internalize(&mut self, pair: SnapshotPair) {
        self.snapshots = Some(pair);
    }

    fn restore(&mut self, pick: fn(&SnapshotPair) -> &[u8]) -> Result<(), HistoryError> {
        let pair = self.snapshots.as_ref().ok_or(ActionError::NotCaptured)?;
        self.memento
            .restore_state(pick(pair))
            .map_err(ActionError::Restore)?;
        Ok(())
    }
}

impl Reversible for SnapshotAction {
    fn run(&mut self) -> Result<(), HistoryError> {
        let before = self.memento.capture_state().map_err(ActionError::Capture)?;
        self.memento.apply()?;
        let after = self.memento.capture_state().map_err(ActionError::Capture)?;

        self.snapshots = Some(SnapshotPair { before, after });
        Ok(())
    }

    fn undo(&mut self) -> Result<(), HistoryError> {
        self.restore(|pair| pair.before.as_slice())
    }

    fn redo(&mut self) -> Result<(), HistoryError> {
        self.restore(|pair| pair.after.as_slice())
    }
}

impl fmt::Debug for SnapshotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotAction")
            .field("resident", &self.is_resident())
            .field("bytes", &self.snapshots.as_ref().map_or(0, SnapshotPair::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Appends a dot to a shared buffer, snapshotting the buffer as UTF-8
    struct AppendDot {
        buf: Rc<RefCell<String>>,
        fail_capture: bool,
        fail_restore: bool,
    }

    impl AppendDot {
        fn new(buf: &Rc<RefCell<String>>) -> Self {
            Self {
                buf: Rc::clone(buf),
                fail_capture: false,
                fail_restore: false,
            }
        }
    }

    impl Memento for AppendDot {
        fn apply(&mut self) -> Result<(), ActionError> {
            self.buf.borrow_mut().push('.');
            Ok(())
        }

        fn capture_state(&self) -> io::Result<Vec<u8>> {
            if self.fail_capture {
                return Err(io::Error::new(io::ErrorKind::Other, "capture refused"));
            }
            Ok(self.buf.borrow().as_bytes().to_vec())
        }

        fn restore_state(&mut self, state: &[u8]) -> io::Result<()> {
            if self.fail_restore {
                return Err(io::Error::new(io::ErrorKind::Other, "restore refused"));
            }
            let text = String::from_utf8(state.to_vec())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            *self.buf.borrow_mut() = text;
            Ok(())
        }
    }

    #[test]
    fn test_run_captures_both_snapshots() {
        let buf = Rc::new(RefCell::new("...".to_string()));
        let mut action = SnapshotAction::new(AppendDot::new(&buf));
        assert!(!action.is_resident());

        action.run().unwrap();

        assert_eq!(*buf.borrow(), "....");
        let pair = action.snapshots().unwrap();
        assert_eq!(pair.before, b"...");
        assert_eq!(pair.after, b"....");
    }

    #[test]
    fn test_undo_redo_restore_snapshots() {
        let buf = Rc::new(RefCell::new("...".to_string()));
        let mut action = SnapshotAction::new(AppendDot::new(&buf));

        action.run().unwrap();
        action.undo().unwrap();
        assert_eq!(*buf.borrow(), "...");

        action.redo().unwrap();
        assert_eq!(*buf.borrow(), "....");
    }

    #[test]
    fn test_undo_twice_is_idempotent() {
        let buf = Rc::new(RefCell::new("...".to_string()));
        let mut action = SnapshotAction::new(AppendDot::new(&buf));

        action.run().unwrap();
        action.undo().unwrap();
        action.undo().unwrap();
        assert_eq!(*buf.borrow(), "...");
    }

    #[test]
    fn test_undo_before_run_is_an_error() {
        let buf = Rc::new(RefCell::new(String::new()));
        let mut action = SnapshotAction::new(AppendDot::new(&buf));

        let err = action.undo().unwrap_err();
        assert!(matches!(err, HistoryError::Action(ActionError::NotCaptured)));
    }

    #[test]
    fn test_capture_failure_surfaces_and_stores_nothing() {
        let buf = Rc::new(RefCell::new(String::new()));
        let mut memento = AppendDot::new(&buf);
        memento.fail_capture = true;
        let mut action = SnapshotAction::new(memento);

        let err = action.run().unwrap_err();
        assert!(matches!(err, HistoryError::Action(ActionError::Capture(_))));
        assert!(!action.is_resident());
    }

    #[test]
    fn test_restore_failure_surfaces() {
        let buf = Rc::new(RefCell::new("x".to_string()));
        let mut memento = AppendDot::new(&buf);
        memento.fail_restore = true;
        let mut action = SnapshotAction::new(memento);

        action.run().unwrap();
        let err = action.undo().unwrap_err();
        assert!(matches!(err, HistoryError::Action(ActionError::Restore(_))));
        assert_eq!(*buf.borrow(), "x.");
    }

    #[test]
    fn test_externalize_and_internalize() {
        let buf = Rc::new(RefCell::new("ab".to_string()));
        let mut action = SnapshotAction::new(AppendDot::new(&buf));
        action.run().unwrap();

        let pair = action.externalize().unwrap();
        assert!(!action.is_resident());
        assert!(action.redo().is_err());

        action.internalize(pair.clone());
        assert_eq!(action.snapshots(), Some(&pair));
        action.undo().unwrap();
        assert_eq!(*buf.borrow(), "ab");
    }
}
