//! Credential store trait.

use async_trait::async_trait;

use super::model::SessionCredentials;
use crate::error::Result;

/// Persistent client-side storage of the session credential pair.
///
/// The authenticated client is the only writer of the access token while a
/// session is running; login and logout own the initial write and the final
/// clear.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credentials (empty if signed out).
    async fn load(&self) -> Result<SessionCredentials>;

    /// Replaces both tokens.
    async fn save(&self, credentials: SessionCredentials) -> Result<()>;

    /// Removes every stored token.
    async fn clear(&self) -> Result<()>;

    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.access_token)
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.refresh_token)
    }

    /// Stores a refreshed access token, and a rotated refresh token when the
    /// server issued one.
    async fn store_refreshed(&self, access_token: String, refresh_token: Option<String>) -> Result<()> {
        let mut credentials = self.load().await?;
        credentials.access_token = Some(access_token);
        if let Some(refresh_token) = refresh_token {
            credentials.refresh_token = Some(refresh_token);
        }
        self.save(credentials).await
    }
}
