//! Standard filesystem paths for cryptvol.

use std::path::PathBuf;

use once_cell::sync::Lazy;

/// Default configuration directory for cryptvol.
pub static CRYPTVOL_CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("CRYPTVOL_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cryptvol")
        })
});

/// Default data directory for cryptvol (log files).
pub static CRYPTVOL_DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("CRYPTVOL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cryptvol")
        })
});

/// Standard paths used by the cryptvol CLI.
#[derive(Debug, Clone)]
pub struct CryptvolPaths {
    /// Configuration directory.
    pub config: PathBuf,
    /// Data directory.
    pub data: PathBuf,
}

impl CryptvolPaths {
    /// Create paths with default locations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("cryptvol.toml")
    }

    /// Program log file.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data.join("cryptvol.log")
    }

    /// Create all necessary directories.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn create_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}

impl Default for CryptvolPaths {
    fn default() -> Self {
        Self {
            config: CRYPTVOL_CONFIG_DIR.clone(),
            data: CRYPTVOL_DATA_DIR.clone(),
        }
    }
}
