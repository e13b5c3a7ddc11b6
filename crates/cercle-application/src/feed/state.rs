//! Observable state of the feed.

use std::collections::HashMap;

use cercle_core::feed::{FeedFilter, FeedSnapshot, LikeSnapshot, Pagination, Post, PostId};

use super::like::{LikeState, PendingLike};

/// Everything a feed view renders.
///
/// Published through a `watch` channel by [`super::InteractionStore`]; observers
/// always see a consistent value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    /// Loaded posts in display order. Duplicates are kept.
    pub posts: Vec<Post>,
    pub pagination: Pagination,
    /// True while at least one fetch is in flight.
    pub loading: bool,
    /// Dismissible message of the last failed read or like.
    pub error: Option<String>,
    pub filter: FeedFilter,
    /// Posts with an unresolved like toggle.
    pub pending_likes: HashMap<PostId, PendingLike>,
    pub(crate) in_flight_fetches: usize,
    /// Bumped by `clear_feed`; responses from an older epoch are discarded.
    pub(crate) epoch: u64,
}

impl FeedState {
    pub fn post(&self, post_id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn like_state(&self, post_id: PostId) -> LikeState {
        if self.pending_likes.contains_key(&post_id) {
            LikeState::Pending
        } else {
            LikeState::Idle
        }
    }

    pub fn is_pending(&self, post_id: PostId) -> bool {
        self.like_state(post_id) == LikeState::Pending
    }

    /// The persisted subset of this state.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot::new(self.filter, self.posts.clone())
    }

    /// Writes the like fields of every post carrying `post_id`.
    pub(crate) fn apply_like(&mut self, post_id: PostId, like: LikeSnapshot) {
        self.posts
            .iter_mut()
            .filter(|post| post.id == post_id)
            .for_each(|post| post.apply_like(like));
    }

    /// Whether the pending entry for `post_id` belongs to `ticket`.
    pub(crate) fn owns_pending(&self, post_id: PostId, ticket: u64) -> bool {
        self.pending_likes
            .get(&post_id)
            .is_some_and(|pending| pending.ticket == ticket)
    }
}
