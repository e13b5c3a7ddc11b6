//! Wires configuration, storage, network and store together.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use cercle_application::{FeedSessionReset, InteractionStore};
use cercle_core::config::ClientConfig;
use cercle_core::feed::FeedSnapshotRepository;
use cercle_core::http::HttpTransport;
use cercle_core::session::{CredentialStore, SessionListener};
use cercle_infrastructure::{ConfigService, FileCredentialStore, FileFeedSnapshotRepository};
use cercle_interaction::{AuthenticatedClient, CercleApi, ReqwestTransport};

/// Drops the expired session's feed, then asks the user to sign in again.
/// The CLI equivalent of redirecting to login.
struct LoginPromptListener {
    feed: FeedSessionReset,
}

#[async_trait]
impl SessionListener for LoginPromptListener {
    async fn session_expired(&self) {
        self.feed.session_expired().await;
        tracing::error!("Session expired. Sign in again and run `cercle session set`.");
    }
}

pub struct AppContext {
    pub config: ClientConfig,
    pub credentials: Arc<dyn CredentialStore>,
    pub api: Arc<CercleApi>,
    pub store: Arc<InteractionStore>,
}

impl AppContext {
    pub fn build(api_url: Option<String>) -> Result<Self> {
        let mut config = ConfigService::new()?
            .get_config()
            .context("Failed to load configuration")?;
        if let Some(url) = api_url {
            config = config.with_api_base_url(url);
        }
        tracing::debug!(api = %config.api_base_url, "Using API");

        let transport = Arc::new(ReqwestTransport::from_config(&config));
        let credentials = Arc::new(FileCredentialStore::new()?);
        let snapshots = Arc::new(FileFeedSnapshotRepository::new()?);

        Ok(Self::assemble(config, transport, credentials, snapshots))
    }

    /// Builds the client stack over `transport`. Session expiry clears the
    /// credentials and the feed, snapshot included.
    fn assemble(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
        snapshots: Arc<dyn FeedSnapshotRepository>,
    ) -> Self {
        let listener = Arc::new(LoginPromptListener {
            feed: FeedSessionReset::new(),
        });
        let client = AuthenticatedClient::new(transport, credentials.clone(), listener.clone());
        let api = Arc::new(CercleApi::new(Arc::new(client)));
        let store = Arc::new(InteractionStore::new(api.clone()).with_snapshot_repository(snapshots));
        listener.feed.attach(&store);

        Self {
            config,
            credentials,
            api,
            store,
        }
    }
}
