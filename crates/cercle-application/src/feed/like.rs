//! Optimistic like state machine.
//!
//! Per post: `Idle -> Pending -> {Committed | RolledBack} -> Idle`.
//! The `Pending` phase is owned by a [`LikeTransition`]; resolving it or
//! dropping it always returns the post to `Idle`.

use tokio::sync::watch;

use cercle_core::feed::{FeedSnapshot, LikeSnapshot, PostId};

use super::state::FeedState;

/// Like phase of a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Idle,
    Pending,
}

/// Bookkeeping for an unresolved toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLike {
    /// Identifies the toggle that registered this entry.
    pub ticket: u64,
    /// Like fields before the optimistic update.
    pub before: LikeSnapshot,
}

/// Result of [`super::InteractionStore::toggle_like`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// A toggle was already pending or the post is not loaded; nothing was sent.
    Ignored,
    /// The server accepted the toggle; carries the authoritative values.
    Committed(LikeSnapshot),
    /// The request failed; the post shows its pre-toggle values again.
    RolledBack,
}

/// Owns one post's `Pending` phase.
///
/// Dropping an unresolved transition rolls back. A transition only touches the
/// pending entry carrying its ticket, so a stale transition never resolves a
/// newer toggle.
pub(crate) struct LikeTransition<'a> {
    state: &'a watch::Sender<FeedState>,
    post_id: PostId,
    ticket: u64,
    resolved: bool,
}

impl<'a> LikeTransition<'a> {
    pub(crate) fn new(state: &'a watch::Sender<FeedState>, post_id: PostId, ticket: u64) -> Self {
        Self {
            state,
            post_id,
            ticket,
            resolved: false,
        }
    }

    /// Overwrites the like fields with the server's values.
    ///
    /// Returns the resulting snapshot, or `None` if the pending entry was
    /// already gone (feed cleared).
    pub(crate) fn commit(mut self, server: LikeSnapshot) -> Option<FeedSnapshot> {
        self.resolved = true;
        let (post_id, ticket) = (self.post_id, self.ticket);
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if !state.owns_pending(post_id, ticket) {
                return false;
            }
            state.pending_likes.remove(&post_id);
            state.apply_like(post_id, server);
            snapshot = Some(state.snapshot());
            true
        });
        snapshot
    }

    /// Restores the pre-toggle values, optionally reporting `error`.
    ///
    /// Returns the resulting snapshot like [`Self::commit`].
    pub(crate) fn roll_back(mut self, error: Option<String>) -> Option<FeedSnapshot> {
        self.resolved = true;
        self.restore(error)
    }

    fn restore(&self, error: Option<String>) -> Option<FeedSnapshot> {
        let (post_id, ticket) = (self.post_id, self.ticket);
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if !state.owns_pending(post_id, ticket) {
                return false;
            }
            if let Some(pending) = state.pending_likes.remove(&post_id) {
                state.apply_like(post_id, pending.before);
            }
            if error.is_some() {
                state.error = error;
            }
            snapshot = Some(state.snapshot());
            true
        });
        snapshot
    }
}

impl Drop for LikeTransition<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            tracing::debug!(post_id = %self.post_id, "Like toggle dropped before resolution, rolling back");
            self.restore(None);
        }
    }
}
