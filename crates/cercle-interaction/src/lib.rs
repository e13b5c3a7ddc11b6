//! Network layer of the Cercle client.
//!
//! - [`ReqwestTransport`]: plain HTTP over reqwest
//! - [`AuthenticatedClient`]: bearer auth with single-flight token refresh
//! - [`CercleApi`]: typed feed and session endpoints

pub mod api;
pub mod auth_client;
pub mod reqwest_transport;

#[cfg(test)]
mod mock;

pub use crate::api::CercleApi;
pub use crate::auth_client::AuthenticatedClient;
pub use crate::reqwest_transport::ReqwestTransport;
