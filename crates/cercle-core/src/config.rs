//! Client configuration model.

use serde::{Deserialize, Serialize};

/// Number of posts requested per feed page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default API location used when neither config.toml nor the environment sets one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default interval between session liveness checks in seconds.
pub const DEFAULT_LIVENESS_INTERVAL_SECS: u64 = 300;

/// Runtime configuration for the Cercle client.
///
/// Loaded from `config.toml` in the cercle config directory, with
/// environment overrides applied on top (see `ConfigService`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_base_url: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout_secs: u64,
    /// Interval between periodic session liveness checks.
    pub liveness_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            liveness_interval_secs: DEFAULT_LIVENESS_INTERVAL_SECS,
        }
    }
}

impl ClientConfig {
    /// Returns a copy with a different API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
