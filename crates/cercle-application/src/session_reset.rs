//! Drops the feed of a session that ended.

use async_trait::async_trait;
use std::sync::{Arc, OnceLock, Weak};

use cercle_core::session::SessionListener;

use crate::feed::InteractionStore;

/// Session listener that clears an [`InteractionStore`], its persisted
/// snapshot included, when the session expires.
///
/// The store is usually built on top of the client that notifies this
/// listener, so it is attached after construction. Only a weak reference is
/// kept.
#[derive(Default)]
pub struct FeedSessionReset {
    store: OnceLock<Weak<InteractionStore>>,
}

impl FeedSessionReset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the store to clear. Later calls are ignored.
    pub fn attach(&self, store: &Arc<InteractionStore>) {
        if self.store.set(Arc::downgrade(store)).is_err() {
            tracing::warn!("Feed session reset already attached");
        }
    }
}

#[async_trait]
impl SessionListener for FeedSessionReset {
    async fn session_expired(&self) {
        match self.store.get().and_then(Weak::upgrade) {
            Some(store) => store.clear_feed().await,
            None => tracing::debug!("No feed attached to clear on session expiry"),
        }
    }
}
