//! Configuration service implementation.
//!
//! Loads the engine configuration from `config.toml` under the platform
//! config directory (~/.config/onboard/config.toml), or from an explicit
//! path, and caches it.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use onboard_core::config::EngineConfig;
use onboard_core::{JourneyError, Result};

use crate::paths::OnboardPaths;

/// Configuration service that loads and caches the engine configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; `None` resolves the platform path.
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<EngineConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform `config.toml`.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the platform file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<EngineConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| JourneyError::internal("config cache lock poisoned"))?;
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| JourneyError::internal("config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_config(&self) -> Result<EngineConfig> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => OnboardPaths::default().config_file()?,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "[Config] No config file; using defaults");
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            JourneyError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "[Config] Loaded configuration");
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::journey::JourneyType;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.get_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "default_journey = \"etb\"\n\n[latency]\nkyc_verify_ms = 10\n",
        )
        .unwrap();

        let config = ConfigService::with_path(&path).get_config().unwrap();
        assert_eq!(config.default_journey, JourneyType::ExistingExpress);
        assert_eq!(config.latency.kyc_verify_ms, 10);
        assert_eq!(config.latency.otp_send_ms, 1500);
        assert_eq!(config.storage_prefix, "hdfcJourney_");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "default_journey = [").unwrap();

        let err = ConfigService::with_path(&path).get_config().unwrap_err();
        assert!(matches!(err, JourneyError::Config(_)));
    }

    #[test]
    fn test_cache_and_invalidate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().unwrap().inactivity_timeout_secs, 300);

        fs::write(&path, "inactivity_timeout_secs = 60\n").unwrap();
        assert_eq!(service.get_config().unwrap().inactivity_timeout_secs, 300);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().inactivity_timeout_secs, 60);
    }
}
