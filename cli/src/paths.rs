//! Path utilities for voicegate.

use std::io;
use std::path::PathBuf;

/// Default base directory name.
pub const DEFAULT_BASE_DIR: &str = ".voicegate";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default template store filename.
pub const DEFAULT_STORE_FILE: &str = "templates.json";

/// Provides access to the voicegate directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    /// User's home directory.
    pub home_dir: PathBuf,
}

impl Paths {
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self { home_dir })
    }

    /// Returns the base directory (~/.voicegate).
    pub fn base_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_BASE_DIR)
    }

    /// Returns the config file path (~/.voicegate/config.yaml).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir().join(DEFAULT_CONFIG_FILE)
    }

    /// Returns the data directory (~/.voicegate/data).
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir().join("data")
    }

    /// Returns the default template store (~/.voicegate/data/templates.json).
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join(DEFAULT_STORE_FILE)
    }
}
