//! Swapping snapshot actions to disk
//!
//! A [`SwapAgent`] owns one [`SnapshotAction`] and can move its snapshot pair
//! out to a single temp file (a [`SwapRecord`]) and back. Any `run`, `undo` or
//! `redo` through the agent swaps the pair back in first.
//!
//! Records are `tempfile` temp paths, so a record that is dropped without
//! being swapped in is deleted from disk as well.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::debug;

use crate::action::Reversible;
use crate::error::{HistoryError, SwapError};
use crate::snapshot::{SnapshotAction, SnapshotPair};

const RECORD_PREFIX: &str = "history-";
const RECORD_SUFFIX: &str = ".tmp";

/// A snapshot pair written to a uniquely named file in the swap directory
#[derive(Debug)]
pub struct SwapRecord {
    path: TempPath,
}

impl SwapRecord {
    /// Write `pair` to a new record in `dir`
    ///
    /// On failure the partially written file is removed.
    pub fn write(dir: &Path, pair: &SnapshotPair) -> Result<Self, SwapError> {
        let file = tempfile::Builder::new()
            .prefix(RECORD_PREFIX)
            .suffix(RECORD_SUFFIX)
            .tempfile_in(dir)
            .map_err(|source| SwapError::Create {
                dir: dir.to_path_buf(),
                source,
            })?;
        let (file, path) = file.into_parts();

        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, pair)
            .and_then(|()| writer.flush().map_err(|e| Box::new(bincode::ErrorKind::Io(e))))
            .map_err(|source| SwapError::Encode {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), bytes = pair.len(), "created swap record");
        Ok(Self { path })
    }

    /// Decode the snapshot pair, leaving the record on disk
    pub fn read(&self) -> Result<SnapshotPair, SwapError> {
        let file = File::open(&self.path).map_err(|source| SwapError::Open {
            path: self.path.to_path_buf(),
            source,
        })?;

        bincode::deserialize_from(BufReader::new(file)).map_err(|source| SwapError::Decode {
            path: self.path.to_path_buf(),
            source,
        })
    }

    /// Delete the record from disk
    pub fn discard(self) -> Result<(), SwapError> {
        let path = self.path.to_path_buf();
        self.path
            .close()
            .map_err(|source| SwapError::Delete { path, source })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Wraps a [`SnapshotAction`] so its snapshots can live on disk
#[derive(Debug)]
pub struct SwapAgent {
    action: SnapshotAction,
    dir: PathBuf,
    record: Option<SwapRecord>,
}

impl SwapAgent {
    pub fn new(action: SnapshotAction, dir: impl Into<PathBuf>) -> Self {
        Self {
            action,
            dir: dir.into(),
            record: None,
        }
    }

    /// Move the action's snapshots out to a new swap record
    ///
    /// Does nothing if already swapped. If the record can't be written the
    /// snapshots stay in memory untouched.
    pub fn swap_out(&mut self) -> Result<(), SwapError> {
        if self.record.is_some() {
            return Ok(());
        }

        let pair = self.action.snapshots().ok_or(SwapError::NotResident)?;
        let record = SwapRecord::write(&self.dir, pair)?;

        self.action.externalize();
        self.record = Some(record);
        Ok(())
    }

    /// Bring the snapshots back from disk and delete the record
    ///
    /// Does nothing if no record is outstanding. A record that can't be read
    /// is kept (and removed when the agent is dropped); the action's
    /// snapshots are lost in that case.
    pub fn swap_in(&mut self) -> Result<(), SwapError> {
        let Some(record) = self.record.take() else {
            return Ok(());
        };

        let pair = match record.read() {
            Ok(pair) => pair,
            Err(e) => {
                self.record = Some(record);
                return Err(e);
            }
        };

        debug!(path = %record.path().display(), "swapping in history action");
        self.action.internalize(pair);
        record.discard()
    }

    /// Delete the outstanding record without reading it back
    pub fn discard_record(&mut self) -> Result<(), SwapError> {
        match self.record.take() {
            Some(record) => record.discard(),
            None => Ok(()),
        }
    }

    /// True if a swap record is outstanding
    pub fn is_swapped(&self) -> bool {
        self.record.is_some()
    }

    /// True if the wrapped action holds its snapshots in memory
    pub fn is_resident(&self) -> bool {
        self.action.is_resident()
    }

    pub fn record_path(&self) -> Option<&Path> {
        self.record.as_ref().map(SwapRecord::path)
    }

    pub fn action(&self) -> &SnapshotAction {
        &self.action
    }

    /// Unwrap the action; hands the agent back while a record is outstanding
    pub fn into_inner(self) -> Result<SnapshotAction, Self> {
        if self.is_swapped() {
            return Err(self);
        }
        Ok(self.action)
    }
}

impl Reversible for SwapAgent {
    fn run(&mut self) -> Result<(), HistoryError> {
        self.swap_in()?;
        self.action.run()
    }

    fn undo(&mut self) -> Result<(), HistoryError> {
        self.swap_in()?;
        self.action.undo()
    }

    fn redo(&mut self) -> Result<(), HistoryError> {
        self.swap_in()?;
        self.action.redo()
    }
}
