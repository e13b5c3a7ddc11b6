//! Authenticated HTTP client with one-shot token refresh.
//!
//! [`AuthenticatedClient`] decorates a plain [`HttpTransport`]: it attaches
//! the stored bearer token, and on a 401 exchanges the refresh token for a new
//! access token and retries the original request once.
//!
//! Refreshes are single-flight. Concurrent 401s queue on one gate; whoever
//! gets through after a successful refresh reuses the stored token instead of
//! calling the refresh endpoint again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use cercle_core::CercleError;
use cercle_core::error::Result;
use cercle_core::http::{ApiRequest, ApiResponse, HttpTransport};
use cercle_core::session::{CredentialStore, SessionListener};

/// Token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
    listener: Arc<dyn SessionListener>,
    refresh_gate: Mutex<()>,
}

impl AuthenticatedClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
        listener: Arc<dyn SessionListener>,
    ) -> Self {
        Self {
            transport,
            credentials,
            listener,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Sends `request` with the current access token.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if no access token is stored (nothing is sent)
    /// - `SessionExpired` if the server rejected the token and refreshing failed
    /// - `Network` on transport failure
    ///
    /// Any other status, including a 401 on the retried request, is returned
    /// as a response for the caller to interpret.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let token = self
            .credentials
            .access_token()
            .await?
            .ok_or(CercleError::Unauthenticated)?;

        let response = self
            .transport
            .send(request.clone().with_bearer(token.clone()))
            .await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        tracing::info!(path = %request.path, "Access token rejected, refreshing session");
        let fresh_token = self.refresh(&token).await?;

        self.transport.send(request.with_bearer(fresh_token)).await
    }

    /// Returns an access token newer than `rejected`, refreshing if needed.
    async fn refresh(&self, rejected: &str) -> Result<String> {
        let _gate = self.refresh_gate.lock().await;

        match self.credentials.access_token().await? {
            None => {
                tracing::debug!("Session already cleared by a concurrent refresh");
                return Err(CercleError::SessionExpired);
            }
            Some(current) if current != rejected => {
                tracing::debug!("Reusing token from a concurrent refresh");
                return Ok(current);
            }
            Some(_) => {}
        }

        match self.request_new_token().await {
            Ok(token) => {
                tracing::info!("Session refreshed");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                self.expire_session().await;
                Err(CercleError::SessionExpired)
            }
        }
    }

    async fn request_new_token(&self) -> Result<String> {
        let refresh_token = self
            .credentials
            .refresh_token()
            .await?
            .ok_or_else(|| CercleError::config("No refresh token stored"))?;

        let request = ApiRequest::post(REFRESH_PATH).with_json(&RefreshRequest {
            refresh_token: &refresh_token,
        })?;
        let body: RefreshResponse = self.transport.send(request).await?.error_for_status()?.json()?;

        self.credentials
            .store_refreshed(body.access_token.clone(), body.refresh_token)
            .await?;
        Ok(body.access_token)
    }

    async fn expire_session(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::error!(error = %e, "Failed to clear session credentials");
        }
        tracing::error!("Session expired, credentials cleared");
        self.listener.session_expired().await;
    }
}

#[async_trait]
impl HttpTransport for AuthenticatedClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        AuthenticatedClient::send(self, request).await
    }
}
