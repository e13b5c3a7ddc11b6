//! Feed interaction store.

mod like;
mod state;
mod store;

pub use like::{LikeOutcome, LikeState, PendingLike};
pub use state::FeedState;
pub use store::{CREATE_POST_ERROR, CreatePostOutcome, InteractionStore, LIKE_ERROR};

#[cfg(test)]
mod tests;
