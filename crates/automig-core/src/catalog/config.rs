//! Catalog configuration.

use crate::error::Error;
use std::path::PathBuf;

/// Default directory for the catalog database.
pub const DEFAULT_DATA_PATH: &str = "./data";

/// Configuration for opening the catalog database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Path to the database directory.
    pub path: PathBuf,
    /// Discard the database when the last handle is dropped.
    pub temporary: bool,
}

impl CatalogConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temporary: false,
        }
    }

    /// Create a configuration for a throwaway database.
    pub fn temporary() -> Self {
        Self {
            path: PathBuf::new(),
            temporary: true,
        }
    }

    /// Set the database path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Open the sled database described by this configuration.
    pub fn open_db(&self) -> Result<sled::Db, Error> {
        let config = if self.temporary {
            sled::Config::new().temporary(true)
        } else {
            sled::Config::new().path(&self.path)
        };
        Ok(config.open()?)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}
