//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use cercle_core::CercleError;
use cercle_core::config::ClientConfig;
use cercle_core::error::Result;
use cercle_core::http::{ApiRequest, ApiResponse, HttpTransport, Method};

/// Sends [`ApiRequest`]s to the Cercle API over HTTP.
///
/// Every request carries `Content-Type: application/json` and the configured
/// timeout. Transport failures, timeouts included, map to
/// [`CercleError::Network`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, path = %request.path, "Sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CercleError::network(format!("Request to {} timed out", request.path))
            } else {
                CercleError::network(format!("Request to {} failed: {}", request.path, e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CercleError::network(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(status, path = %request.path, "Received response");
        Ok(ApiResponse::new(status, body))
    }
}
