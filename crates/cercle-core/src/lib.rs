//! Domain layer of the Cercle client.
//!
//! Holds the models the feed store works on, the shared error type, and the
//! traits every outer layer implements: [`http::HttpTransport`],
//! [`feed::FeedApi`], [`feed::FeedSnapshotRepository`],
//! [`session::CredentialStore`], [`session::SessionListener`] and
//! [`session::SessionProbe`].

pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod session;

// Re-export common error type
pub use error::CercleError;
