//! Session lifecycle seams: expiry notification and liveness probing.

use async_trait::async_trait;

use crate::error::Result;

/// Receives the terminal session event.
///
/// Called once the credentials have been cleared after a failed refresh, and
/// awaited before the failing request returns. Implementations drop any other
/// state belonging to the session and lead the user back to login.
#[async_trait]
pub trait SessionListener: Send + Sync {
    async fn session_expired(&self);
}

/// Checks whether the current session is still accepted by the server.
#[async_trait]
pub trait SessionProbe: Send + Sync {
    async fn probe(&self) -> Result<()>;
}
