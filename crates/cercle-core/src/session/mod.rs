//! Session credentials, their storage trait, and session lifecycle seams.

mod events;
mod model;
mod store;

pub use events::{SessionListener, SessionProbe};
pub use model::SessionCredentials;
pub use store::CredentialStore;
