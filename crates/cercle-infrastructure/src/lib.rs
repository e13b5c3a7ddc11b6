//! File-backed persistence and configuration for the Cercle client.

pub mod config_service;
pub mod credential_store;
pub mod dto;
pub mod feed_snapshot_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::credential_store::{FileCredentialStore, MemoryCredentialStore};
pub use crate::feed_snapshot_repository::FileFeedSnapshotRepository;
pub use crate::paths::CerclePaths;
