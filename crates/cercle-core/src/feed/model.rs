//! Feed domain models.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;

/// Identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        PostId(id)
    }
}

/// Author information attached to a post. Supplied by the server, never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    #[serde(default, alias = "username")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// A post as displayed in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: UserSummary,
    pub content: String,
    #[serde(default, alias = "likesCount")]
    pub like_count: u32,
    #[serde(default, alias = "repliesCount")]
    pub reply_count: u32,
    /// Viewer-relative like flag; the only field updated ahead of the server.
    #[serde(default)]
    pub is_liked_by_current_user: bool,
    /// Opaque creation timestamp, display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Post {
    /// Current like state of the post.
    pub fn like_snapshot(&self) -> LikeSnapshot {
        LikeSnapshot {
            liked: self.is_liked_by_current_user,
            like_count: self.like_count,
        }
    }

    /// Overwrites the like fields.
    pub fn apply_like(&mut self, snapshot: LikeSnapshot) {
        self.is_liked_by_current_user = snapshot.liked;
        self.like_count = snapshot.like_count;
    }
}

/// The like-related fields of a post: the viewer flag and the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSnapshot {
    pub liked: bool,
    pub like_count: u32,
}

impl LikeSnapshot {
    /// The optimistic result of toggling: flag flipped, counter moved by one.
    ///
    /// The counter saturates at zero when unliking.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                like_count: self.like_count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                like_count: self.like_count.saturating_add(1),
            }
        }
    }
}

/// Which server collection the feed reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    /// Public posts, most recent first.
    #[default]
    Recent,
    /// Posts from friends and followed users, most recent first.
    Friends,
    /// Trending posts in server rank order.
    Popular,
}

impl FeedFilter {
    pub const ALL: [FeedFilter; 3] = [FeedFilter::Recent, FeedFilter::Friends, FeedFilter::Popular];

    /// API path of the collection for this filter.
    pub fn endpoint(&self) -> &'static str {
        match self {
            FeedFilter::Recent => "/posts/public",
            FeedFilter::Friends => "/posts/timeline/personal",
            FeedFilter::Popular => "/posts/trending",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFilter::Recent => "recent",
            FeedFilter::Friends => "friends",
            FeedFilter::Popular => "popular",
        }
    }
}

impl std::fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown feed filter '{}'", s))
    }
}

/// Pagination cursor of the loaded feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number of the last loaded page.
    pub page: u32,
    pub limit: u32,
    pub has_next: bool,
    /// Advisory total supplied by the server.
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            has_next: false,
            total: 0,
        }
    }
}

/// Pagination block as reported by the server; every field may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl PageInfo {
    /// Resolves the cursor, falling back to the requested page, the fixed page
    /// size, `false` and `0` for omitted fields.
    pub fn resolve(info: Option<PageInfo>, requested_page: u32) -> Pagination {
        let info = info.unwrap_or_default();
        Pagination {
            page: info.page.unwrap_or(requested_page),
            limit: info.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            has_next: info.has_next.unwrap_or(false),
            total: info.total.unwrap_or(0),
        }
    }
}

/// One page of posts returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    #[serde(default)]
    pub pagination: Option<PageInfo>,
}

/// Authoritative like state returned by the server after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    #[serde(alias = "liked")]
    pub is_liked: bool,
    #[serde(alias = "likesCount")]
    pub like_count: u32,
}

impl From<LikeStatus> for LikeSnapshot {
    fn from(status: LikeStatus) -> Self {
        LikeSnapshot {
            liked: status.is_liked,
            like_count: status.like_count,
        }
    }
}
