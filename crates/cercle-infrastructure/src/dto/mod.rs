//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of every file the client writes.
//! They are private to the infrastructure layer and handle the evolution of
//! the storage format over time.
//!
//! ### FeedSnapshot Version History
//! - **1.0.0**: Filter stored as a free-form `feedType` string
//! - **2.0.0**: Typed `filter`, optional `savedAt`
//!
//! ### SessionCredentials Version History
//! - **1.0.0**: Initial schema
//!
//! ### ClientConfig Version History
//! - **1.0.0**: Initial schema, every field optional

mod config;
mod feed_snapshot;
mod session;

// Re-export config DTOs and migrator
pub use config::{ClientConfigV1_0_0, create_client_config_migrator};

// Re-export feed snapshot DTOs and migrator
pub use feed_snapshot::{
    AuthorDTO, FeedSnapshotV1_0_0, FeedSnapshotV2_0_0, PostDTO, create_feed_snapshot_migrator,
};

// Re-export session DTOs and migrator
pub use session::{SessionCredentialsV1_0_0, create_session_migrator};
