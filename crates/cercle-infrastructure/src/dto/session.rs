//! Session credential DTOs and migrator.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use cercle_core::session::SessionCredentials;

/// Session credentials schema V1.0.0.
///
/// Stored in `session.json`, readable by the owner only.
#[derive(Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct SessionCredentialsV1_0_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for SessionCredentialsV1_0_0 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentialsV1_0_0").finish_non_exhaustive()
    }
}

// ============================================================================
// Domain conversions
// ============================================================================

impl IntoDomain<SessionCredentials> for SessionCredentialsV1_0_0 {
    fn into_domain(self) -> SessionCredentials {
        SessionCredentials {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

impl FromDomain<SessionCredentials> for SessionCredentialsV1_0_0 {
    fn from_domain(credentials: SessionCredentials) -> Self {
        SessionCredentialsV1_0_0 {
            access_token: credentials.access_token,
            refresh_token: credentials.refresh_token,
        }
    }
}

// ============================================================================
// Migrator
// ============================================================================

/// Creates a migrator for session credential entities.
pub fn create_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let session_path = version_migrate::Migrator::define("session")
        .from::<SessionCredentialsV1_0_0>()
        .into_with_save::<SessionCredentials>();

    migrator
        .register(session_path)
        .expect("Failed to register session migration path");

    migrator
}
