//! Path management for onboarding configuration and state files.
//!
//! Paths are resolved via AppPaths from the version-migrate crate, so they
//! follow platform conventions (XDG on Linux/macOS, appropriate on Windows).

use std::path::PathBuf;

use onboard_core::{JourneyError, Result};
use version_migrate::AppPaths;

/// Application name used for platform directories.
pub const APP_NAME: &str = "onboard";

/// Path management for onboard.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/onboard/           # Config directory
/// └── config.toml              # Engine configuration
///
/// ~/.local/share/onboard/      # State directory (overridable)
/// └── journey-state.json       # Persisted journey keys
/// ```
#[derive(Debug, Clone, Default)]
pub struct OnboardPaths {
    state_dir_override: Option<PathBuf>,
}

impl OnboardPaths {
    /// Creates a resolver; `state_dir` replaces the platform data directory.
    pub fn new(state_dir: Option<PathBuf>) -> Self {
        Self {
            state_dir_override: state_dir,
        }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    /// Returns the platform configuration directory (e.g. `~/.config/onboard/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        Self::app_paths()
            .config_dir()
            .map_err(|e| JourneyError::config(format!("Cannot resolve config directory: {}", e)))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the directory persisted journey state lives in.
    pub fn state_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.state_dir_override {
            return Ok(dir.clone());
        }
        Self::app_paths()
            .data_dir()
            .map_err(|e| JourneyError::config(format!("Cannot resolve data directory: {}", e)))
    }

    /// Returns the path of the file-backed key-value store.
    pub fn state_file(&self) -> Result<PathBuf> {
        Ok(self.state_dir()?.join("journey-state.json"))
    }
}
