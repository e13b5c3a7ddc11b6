//! Persisted feed snapshot.
//!
//! A snapshot is the part of the feed that survives a restart: the selected
//! filter and the last displayed posts. Pagination, loading flags and pending
//! likes are runtime-only and never persisted.

use serde::{Deserialize, Serialize};

use super::model::{FeedFilter, Post};

/// The persisted subset of the feed, shown stale until re-fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub filter: FeedFilter,
    #[serde(default)]
    pub posts: Vec<Post>,
    /// RFC 3339 timestamp of the save, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl FeedSnapshot {
    pub fn new(filter: FeedFilter, posts: Vec<Post>) -> Self {
        Self {
            filter,
            posts,
            saved_at: None,
        }
    }

    pub fn with_saved_at(mut self, saved_at: impl Into<String>) -> Self {
        self.saved_at = Some(saved_at.into());
        self
    }
}
