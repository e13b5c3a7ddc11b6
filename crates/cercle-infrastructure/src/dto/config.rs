//! Client configuration DTOs and migrator.
//!
//! `config.toml` is hand-edited, so every field is optional and falls back to
//! the built-in default.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use cercle_core::config::ClientConfig;

/// Client configuration schema V1.0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ClientConfigV1_0_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_interval_secs: Option<u64>,
}

// ============================================================================
// Domain conversions
// ============================================================================

impl IntoDomain<ClientConfig> for ClientConfigV1_0_0 {
    fn into_domain(self) -> ClientConfig {
        let default = ClientConfig::default();
        let config = ClientConfig {
            api_base_url: default.api_base_url,
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            liveness_interval_secs: self
                .liveness_interval_secs
                .unwrap_or(default.liveness_interval_secs),
        };
        match self.api_base_url {
            Some(url) if !url.trim().is_empty() => config.with_api_base_url(url.trim()),
            _ => config,
        }
    }
}

impl FromDomain<ClientConfig> for ClientConfigV1_0_0 {
    fn from_domain(config: ClientConfig) -> Self {
        ClientConfigV1_0_0 {
            api_base_url: Some(config.api_base_url),
            request_timeout_secs: Some(config.request_timeout_secs),
            liveness_interval_secs: Some(config.liveness_interval_secs),
        }
    }
}

// ============================================================================
// Migrator
// ============================================================================

/// Creates a migrator for client configuration.
pub fn create_client_config_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let client_config_path = version_migrate::Migrator::define("client_config")
        .from::<ClientConfigV1_0_0>()
        .into_with_save::<ClientConfig>();

    migrator
        .register(client_config_path)
        .expect("Failed to register client_config migration path");

    migrator
}
