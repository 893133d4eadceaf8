//! Undo/redo history with disk-swapped snapshots
//!
//! Record reversible [`Action`]s in a [`HistoryChain`] and move back and
//! forth through them. Actions that capture full before/after snapshots of
//! application state ([`SnapshotAction`]) can get large, so
//! [`MemoryBoundedHistoryChain`] keeps only a configured number of them in
//! memory and swaps the oldest out to temp files, reading them back on
//! demand.
//!
//! # Example
//! ```ignore
//! let mut chain = MemoryBoundedHistoryChain::new(10, swap_dir);
//!
//! chain.run(Action::snapshot(ShuffleRows { table: table.clone() }))?;
//! chain.run_with_history(move || bump(), move || unbump())?;
//!
//! chain.undo()?;
//! chain.redo()?;
//! chain.clear()?;
//! ```
//!
//! Chains are single-threaded and every operation blocks on swap I/O.

pub mod action;
pub mod chain;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod swap;

pub use action::{Action, FnAction, Reversible};
pub use chain::{HistoryChain, MemoryBoundedHistoryChain, SimpleHistoryChain, SwapReport};
pub use config::ChainConfig;
pub use error::{ActionError, ConfigError, HistoryError, SwapError};
pub use snapshot::{Memento, SnapshotAction, SnapshotPair};
pub use swap::{SwapAgent, SwapRecord};
