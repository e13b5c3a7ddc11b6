//! Feed snapshot repository implementation.
//!
//! Stores the last displayed feed as a versioned JSON file.
//! Uses version-migrate for automatic schema migration.
//!
//! File location: `{data_dir}/feed_snapshot.json`

use async_trait::async_trait;
use std::path::PathBuf;
use version_migrate::Migrator;

use cercle_core::CercleError;
use cercle_core::error::Result;
use cercle_core::feed::{FeedSnapshot, FeedSnapshotRepository};

use crate::dto::create_feed_snapshot_migrator;
use crate::paths::CerclePaths;
use crate::storage::AtomicFile;

const ENTITY: &str = "feed_snapshot";

/// File-based feed snapshot repository with version migration support.
pub struct FileFeedSnapshotRepository {
    file: AtomicFile,
    migrator: Migrator,
}

impl FileFeedSnapshotRepository {
    /// Creates a repository at the default data location.
    pub fn new() -> Result<Self> {
        let path =
            CerclePaths::feed_snapshot_file().map_err(|e| CercleError::Config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a repository backed by a custom file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
            migrator: create_feed_snapshot_migrator(),
        }
    }
}

#[async_trait]
impl FeedSnapshotRepository for FileFeedSnapshotRepository {
    async fn load(&self) -> Result<Option<FeedSnapshot>> {
        let Some(content) = self.file.read().await? else {
            return Ok(None);
        };

        let json_value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| CercleError::json(format!("Failed to parse feed snapshot: {}", e)))?;

        let snapshot: FeedSnapshot = self
            .migrator
            .load_flat_from(ENTITY, json_value)
            .map_err(|e| CercleError::Migration(format!("Failed to migrate feed snapshot: {}", e)))?;

        tracing::debug!(
            filter = %snapshot.filter,
            posts = snapshot.posts.len(),
            "Loaded feed snapshot"
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &FeedSnapshot) -> Result<()> {
        let serialized = self
            .migrator
            .save_domain_flat(ENTITY, snapshot.clone())
            .map_err(|e| CercleError::json(format!("Failed to serialize feed snapshot: {}", e)))?;

        self.file.write(&serialized).await
    }

    async fn clear(&self) -> Result<()> {
        self.file.remove().await
    }
}
