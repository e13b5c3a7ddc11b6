//! Feed domain models, the feed API seam and the snapshot repository trait.

mod api;
mod model;
mod repository;
mod snapshot;

pub use api::FeedApi;
pub use model::{
    FeedFilter, LikeSnapshot, LikeStatus, PageInfo, Pagination, Post, PostId, PostPage,
    UserSummary,
};
pub use repository::FeedSnapshotRepository;
pub use snapshot::FeedSnapshot;
