//! Application layer of the Cercle client: the feed interaction store, the
//! session liveness monitor and the feed reset on session expiry.

pub mod feed;
pub mod session_monitor;
pub mod session_reset;

pub use feed::{CreatePostOutcome, FeedState, InteractionStore, LikeOutcome};
pub use session_monitor::{MonitorExit, SessionMonitor};
pub use session_reset::FeedSessionReset;
