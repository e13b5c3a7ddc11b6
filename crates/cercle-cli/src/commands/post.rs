use anyhow::{Result, bail};

use cercle_application::CreatePostOutcome;

use super::utils::print_post;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, content: &str) -> Result<()> {
    ctx.store.restore().await;

    match ctx.store.create_post(content).await {
        CreatePostOutcome::Created(post) => {
            print_post(&post);
            Ok(())
        }
        CreatePostOutcome::Failed { error } => bail!("{}", error),
    }
}
