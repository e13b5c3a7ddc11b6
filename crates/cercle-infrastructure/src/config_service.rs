//! Configuration service implementation.
//!
//! Loads the client configuration from `~/.config/cercle/config.toml`,
//! applies environment overrides and caches the result.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use cercle_core::CercleError;
use cercle_core::config::ClientConfig;
use cercle_core::error::Result;

use crate::dto::create_client_config_migrator;
use crate::paths::CerclePaths;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "CERCLE_API_URL";
/// Overrides `request_timeout_secs`.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CERCLE_REQUEST_TIMEOUT_SECS";

const ENTITY: &str = "client_config";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn new() -> Result<Self> {
        let path = CerclePaths::config_file().map_err(|e| CercleError::Config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading a custom config file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it from file if not cached.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let loaded = apply_env_overrides(self.load_file()?, |key| std::env::var(key).ok());

        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No config file, using defaults");
                return Ok(ClientConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut value: toml::Value = toml::from_str(&content)?;
        // A hand-written file may omit the version key.
        if let toml::Value::Table(ref mut table) = value {
            table
                .entry("version")
                .or_insert(toml::Value::String("1.0.0".to_string()));
        }

        create_client_config_migrator()
            .load_flat_from(ENTITY, value)
            .map_err(|e| {
                CercleError::Config(format!(
                    "Invalid config file {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

/// Applies environment overrides on top of a loaded configuration.
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(
    mut config: ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientConfig {
    if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
        config = config.with_api_base_url(url.trim());
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.request_timeout_secs = secs,
            _ => tracing::warn!(
                value = %raw,
                "Ignoring invalid {}",
                ENV_REQUEST_TIMEOUT_SECS
            ),
        }
    }

    config
}
