//! Path resolution for pomodesk configuration and data files.
//!
//! All pomodesk data is stored in `~/.pomodesk/`:
//! - `config.yaml` - Main configuration file
//! - `pomodesk.log` - Log output
//! - `sounds/` - Ambience and alarm sound files

use std::path::PathBuf;

use crate::error::PomodeskError;

/// Paths to pomodesk configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.pomodesk/`
    pub root: PathBuf,
    /// Config file: `~/.pomodesk/config.yaml`
    pub config_file: PathBuf,
    /// Log file: `~/.pomodesk/pomodesk.log`
    pub log_file: PathBuf,
    /// Sounds directory: `~/.pomodesk/sounds/`
    pub sounds: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// `POMODESK_HOME` overrides the root directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PomodeskError> {
        if let Ok(root) = std::env::var("POMODESK_HOME") {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            PomodeskError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".pomodesk")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            log_file: root.join("pomodesk.log"),
            sounds: root.join("sounds"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), PomodeskError> {
        for dir in [&self.root, &self.sounds] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    PomodeskError::Config(format!(
                        "Failed to create directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}
