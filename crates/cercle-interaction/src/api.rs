//! Typed client for the Cercle REST endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cercle_core::error::Result;
use cercle_core::feed::{FeedApi, FeedFilter, LikeStatus, Post, PostId, PostPage};
use cercle_core::http::{ApiRequest, HttpTransport};
use cercle_core::session::SessionProbe;

/// Current-user endpoint used as a session liveness check.
pub const ME_PATH: &str = "/auth/me";

#[derive(Serialize)]
struct CreatePostRequest<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    post: Post,
}

/// Feed and session endpoints over an (authenticated) transport.
#[derive(Clone)]
pub struct CercleApi {
    transport: Arc<dyn HttpTransport>,
}

impl CercleApi {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl FeedApi for CercleApi {
    async fn list_posts(&self, filter: FeedFilter, page: u32, limit: u32) -> Result<PostPage> {
        let request = ApiRequest::get(filter.endpoint())
            .with_query("page", page)
            .with_query("limit", limit);

        let loaded: PostPage = self.transport.send(request).await?.error_for_status()?.json()?;
        tracing::debug!(%filter, page, posts = loaded.posts.len(), "Loaded feed page");
        Ok(loaded)
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        let request = ApiRequest::post("/posts").with_json(&CreatePostRequest { content })?;

        let response: CreatePostResponse =
            self.transport.send(request).await?.error_for_status()?.json()?;
        tracing::debug!(post_id = %response.post.id, "Created post");
        Ok(response.post)
    }

    async fn toggle_like(&self, post_id: PostId) -> Result<LikeStatus> {
        let request = ApiRequest::post(format!("/likes/posts/{}", post_id));

        self.transport.send(request).await?.error_for_status()?.json()
    }
}

#[async_trait]
impl SessionProbe for CercleApi {
    async fn probe(&self) -> Result<()> {
        self.transport
            .send(ApiRequest::get(ME_PATH))
            .await?
            .error_for_status()?;
        Ok(())
    }
}
