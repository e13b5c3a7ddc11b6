//! Unified path management for cercle files.
//!
//! All paths are resolved via AppPaths from the version-migrate crate so the
//! layout is consistent across platforms.

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for cercle.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/cercle/            # Config directory (AppPaths default)
/// ├── config.toml              # Client configuration
/// └── session.json             # Access and refresh tokens
///
/// ~/.local/share/cercle/       # Data directory
/// └── feed_snapshot.json       # Last displayed feed and filter
/// ```
pub struct CerclePaths;

impl CerclePaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("cercle")
    }

    /// Returns the cercle configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the cercle data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to config.toml.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the session credentials file.
    ///
    /// # Security Note
    ///
    /// The file holds bearer tokens; writers restrict it to mode 600 on Unix.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Returns the path to the persisted feed snapshot.
    pub fn feed_snapshot_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("feed_snapshot.json"))
    }
}
