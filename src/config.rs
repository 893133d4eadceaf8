use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Resident snapshot actions kept in memory when nothing else is configured
pub const DEFAULT_MAX_RESIDENT: usize = 10;

/// Settings for a [`MemoryBoundedHistoryChain`](crate::chain::MemoryBoundedHistoryChain)
///
/// ```toml
/// max_resident = 10
/// swap_dir = "/var/tmp/myapp-history"
/// max_depth = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    /// Snapshot actions allowed to hold their snapshots in memory
    pub max_resident: usize,
    /// Where swap records go (platform temp dir if unset)
    pub swap_dir: Option<PathBuf>,
    /// Undo entries kept before the oldest are dropped (unbounded if unset)
    pub max_depth: Option<usize>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_resident: DEFAULT_MAX_RESIDENT,
            swap_dir: None,
            max_depth: None,
        }
    }
}

impl ChainConfig {
    pub fn new(max_resident: usize) -> Self {
        Self {
            max_resident,
            ..Self::default()
        }
    }

    pub fn with_swap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.swap_dir = Some(dir.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The swap directory to use, falling back to the platform temp dir
    pub fn resolved_swap_dir(&self) -> PathBuf {
        self.swap_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
