//! Error types for actions, swap records and history chains.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by an action's own work.
#[derive(Debug, Error)]
pub enum ActionError {
    /// `capture_state` failed while taking a snapshot.
    #[error("failed to capture state: {0}")]
    Capture(#[source] io::Error),

    /// `restore_state` failed while applying a snapshot.
    #[error("failed to restore state: {0}")]
    Restore(#[source] io::Error),

    /// The action's effect failed.
    #[error("action failed: {0}")]
    Failed(String),

    /// Undo/redo was asked of an action holding no snapshots.
    #[error("no snapshots captured for this action")]
    NotCaptured,
}

/// Failure moving a snapshot pair to or from its backing-store record.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("failed to create swap record in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write swap record {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to open swap record {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read swap record {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to delete swap record {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Swap out was asked of an action whose snapshots are not in memory.
    #[error("action has no resident snapshots to swap out")]
    NotResident,
}

/// Errors surfaced by history chain operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// No more undo steps available.
    #[error("nothing to undo")]
    NothingToUndo,

    /// No more redo steps available.
    #[error("nothing to redo")]
    NothingToRedo,

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Swap(#[from] SwapError),
}

/// Errors loading a [`ChainConfig`](crate::config::ChainConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
