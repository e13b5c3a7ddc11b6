//! Feed snapshot DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema, filter stored as a free-form `feedType` string
//! - **2.0.0**: Typed `filter` field, optional `savedAt` timestamp

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use cercle_core::feed::{FeedFilter, FeedSnapshot, Post, PostId, UserSummary};

// ============================================================================
// Post DTOs (shared by every snapshot version)
// ============================================================================

/// Author DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDTO {
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Post DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDTO {
    pub id: i64,
    pub author: AuthorDTO,
    pub content: String,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default)]
    pub is_liked_by_current_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<PostDTO> for Post {
    fn from(dto: PostDTO) -> Self {
        Post {
            id: PostId(dto.id),
            author: UserSummary {
                id: dto.author.id,
                display_name: dto.author.display_name,
                avatar: dto.author.avatar,
                is_verified: dto.author.is_verified,
            },
            content: dto.content,
            like_count: dto.like_count,
            reply_count: dto.reply_count,
            is_liked_by_current_user: dto.is_liked_by_current_user,
            created_at: dto.created_at,
        }
    }
}

impl From<Post> for PostDTO {
    fn from(post: Post) -> Self {
        PostDTO {
            id: post.id.0,
            author: AuthorDTO {
                id: post.author.id,
                display_name: post.author.display_name,
                avatar: post.author.avatar,
                is_verified: post.author.is_verified,
            },
            content: post.content,
            like_count: post.like_count,
            reply_count: post.reply_count,
            is_liked_by_current_user: post.is_liked_by_current_user,
            created_at: post.created_at,
        }
    }
}

// ============================================================================
// Snapshot DTOs
// ============================================================================

/// Feed snapshot V1.0.0 (initial version).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshotV1_0_0 {
    /// Feed mode as a raw string ("recent", "friends", "popular").
    #[serde(default)]
    pub feed_type: String,
    #[serde(default)]
    pub posts: Vec<PostDTO>,
}

/// Feed snapshot V2.0.0.
///
/// Replaced the free-form `feedType` with a typed `filter` and added `savedAt`.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshotV2_0_0 {
    #[serde(default)]
    pub filter: FeedFilter,
    #[serde(default)]
    pub posts: Vec<PostDTO>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from V1.0.0 to V2.0.0.
/// Unknown feed types fall back to the default filter.
impl MigratesTo<FeedSnapshotV2_0_0> for FeedSnapshotV1_0_0 {
    fn migrate(self) -> FeedSnapshotV2_0_0 {
        FeedSnapshotV2_0_0 {
            filter: self.feed_type.parse().unwrap_or_default(),
            posts: self.posts,
            saved_at: None,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<FeedSnapshot> for FeedSnapshotV2_0_0 {
    fn into_domain(self) -> FeedSnapshot {
        FeedSnapshot {
            filter: self.filter,
            posts: self.posts.into_iter().map(Into::into).collect(),
            saved_at: self.saved_at,
        }
    }
}

impl FromDomain<FeedSnapshot> for FeedSnapshotV2_0_0 {
    fn from_domain(snapshot: FeedSnapshot) -> Self {
        FeedSnapshotV2_0_0 {
            filter: snapshot.filter,
            posts: snapshot.posts.into_iter().map(Into::into).collect(),
            saved_at: snapshot.saved_at,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for feed snapshot entities.
///
/// # Migration Path
///
/// - V1.0.0 → V2.0.0: Parses `feedType` into `filter`
/// - V2.0.0 → FeedSnapshot: Converts DTO to domain model
pub fn create_feed_snapshot_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let snapshot_path = version_migrate::Migrator::define("feed_snapshot")
        .from::<FeedSnapshotV1_0_0>()
        .step::<FeedSnapshotV2_0_0>()
        .into_with_save::<FeedSnapshot>();

    migrator
        .register(snapshot_path)
        .expect("Failed to register feed_snapshot migration path");

    migrator
}
