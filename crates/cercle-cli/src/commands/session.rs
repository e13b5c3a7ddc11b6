use anyhow::Result;

use cercle_core::session::{CredentialStore, SessionCredentials};

use crate::context::AppContext;

pub async fn set(ctx: &AppContext, access_token: String, refresh_token: String) -> Result<()> {
    ctx.credentials
        .save(SessionCredentials::new(access_token, refresh_token))
        .await?;
    println!("Session saved.");
    Ok(())
}

/// Logs out: forgets the tokens and the saved feed.
pub async fn clear(ctx: &AppContext) -> Result<()> {
    ctx.credentials.clear().await?;
    ctx.store.clear_feed().await;
    println!("Session cleared.");
    Ok(())
}
