use anyhow::{Result, bail};

use cercle_application::LikeOutcome;
use cercle_core::CercleError;
use cercle_core::feed::PostId;

use super::utils::print_post;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, post_id: PostId) -> Result<()> {
    let store = &ctx.store;
    store.restore().await;
    if store.state().post(post_id).is_none() {
        store.fetch_posts(true, 1).await;
    }

    match store.toggle_like(post_id).await {
        LikeOutcome::Committed(_) => {
            if let Some(post) = store.state().post(post_id) {
                print_post(post);
            }
            Ok(())
        }
        LikeOutcome::Ignored if store.state().post(post_id).is_none() => {
            Err(CercleError::not_found("post", post_id.to_string()).into())
        }
        LikeOutcome::Ignored => bail!("A like on post {} is already pending", post_id),
        LikeOutcome::RolledBack => match store.state().error {
            Some(error) => bail!("{}", error),
            None => bail!("Like was not applied"),
        },
    }
}
