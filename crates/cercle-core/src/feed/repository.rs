//! Feed snapshot repository trait.

use async_trait::async_trait;

use super::snapshot::FeedSnapshot;
use crate::error::Result;

/// Repository for the persisted feed snapshot.
#[async_trait]
pub trait FeedSnapshotRepository: Send + Sync {
    /// Loads the snapshot. Returns `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<FeedSnapshot>>;

    /// Saves the snapshot, replacing any previous one.
    async fn save(&self, snapshot: &FeedSnapshot) -> Result<()>;

    /// Removes the persisted snapshot. Succeeds if none exists.
    async fn clear(&self) -> Result<()>;
}
