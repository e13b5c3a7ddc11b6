//! Feed API trait.

use async_trait::async_trait;

use super::model::{FeedFilter, LikeStatus, Post, PostId, PostPage};
use crate::error::Result;

/// The feed endpoints the interaction store depends on.
///
/// Implementations authenticate every call and map non-success responses to
/// `CercleError::RequestFailed`.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// Loads one page of the collection selected by `filter`.
    async fn list_posts(&self, filter: FeedFilter, page: u32, limit: u32) -> Result<PostPage>;

    /// Publishes a post and returns the server's copy.
    async fn create_post(&self, content: &str) -> Result<Post>;

    /// Toggles the viewer's like on a post and returns the authoritative state.
    async fn toggle_like(&self, post_id: PostId) -> Result<LikeStatus>;
}
