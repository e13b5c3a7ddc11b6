use anyhow::{Result, bail};

use cercle_core::feed::FeedFilter;

use super::utils::print_feed;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, filter: Option<FeedFilter>, page: u32, append: bool) -> Result<()> {
    let store = &ctx.store;
    store.restore().await;
    if let Some(filter) = filter {
        store.set_filter(filter).await;
    }

    store.fetch_posts(!append, page.max(1)).await;

    let state = store.state();
    if let Some(error) = &state.error {
        bail!("{}", error);
    }
    print_feed(&state);
    Ok(())
}
