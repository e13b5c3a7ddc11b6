//! Credential store implementations.
//!
//! [`FileCredentialStore`] persists the token pair to `session.json` (mode 600
//! on Unix) and caches it in memory. [`MemoryCredentialStore`] keeps the pair
//! in process only and backs tests and ephemeral sessions.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use version_migrate::Migrator;

use cercle_core::CercleError;
use cercle_core::error::Result;
use cercle_core::session::{CredentialStore, SessionCredentials};

use crate::dto::create_session_migrator;
use crate::paths::CerclePaths;
use crate::storage::AtomicFile;

const ENTITY: &str = "session";

/// File-backed credential store.
///
/// The cache is filled on first access. Writes hold the cache lock until the
/// file is replaced, so concurrent saves land in order.
#[derive(Clone)]
pub struct FileCredentialStore {
    file: AtomicFile,
    migrator: Arc<Migrator>,
    cache: Arc<RwLock<Option<SessionCredentials>>>,
}

impl FileCredentialStore {
    /// Creates a store at the default config location.
    pub fn new() -> Result<Self> {
        let path = CerclePaths::session_file().map_err(|e| CercleError::Config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a store backed by a custom file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::private(path),
            migrator: Arc::new(create_session_migrator()),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn read_file(&self) -> Result<SessionCredentials> {
        let Some(content) = self.file.read().await? else {
            return Ok(SessionCredentials::default());
        };

        let json_value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| CercleError::json(format!("Failed to parse session file: {}", e)))?;

        self.migrator
            .load_flat_from(ENTITY, json_value)
            .map_err(|e| CercleError::Migration(format!("Failed to migrate session file: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<SessionCredentials> {
        {
            let cached = self.cache.read().await;
            if let Some(ref credentials) = *cached {
                return Ok(credentials.clone());
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(ref credentials) = *cache {
            return Ok(credentials.clone());
        }
        let loaded = self.read_file().await?;
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    async fn save(&self, credentials: SessionCredentials) -> Result<()> {
        let mut cache = self.cache.write().await;

        let serialized = self
            .migrator
            .save_domain_flat(ENTITY, credentials.clone())
            .map_err(|e| CercleError::json(format!("Failed to serialize session: {}", e)))?;
        self.file.write(&serialized).await?;

        *cache = Some(credentials);
        tracing::debug!(path = %self.file.path().display(), "Saved session credentials");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut cache = self.cache.write().await;
        self.file.remove().await?;
        *cache = Some(SessionCredentials::default());
        tracing::debug!("Cleared session credentials");
        Ok(())
    }
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    credentials: Arc<RwLock<SessionCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: SessionCredentials) -> Self {
        Self {
            credentials: Arc::new(RwLock::new(credentials)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<SessionCredentials> {
        Ok(self.credentials.read().await.clone())
    }

    async fn save(&self, credentials: SessionCredentials) -> Result<()> {
        *self.credentials.write().await = credentials;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.credentials.write().await = SessionCredentials::default();
        Ok(())
    }
}
