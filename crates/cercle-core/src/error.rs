//! Error types for the Cercle client.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for every Cercle crate.
///
/// Network-facing variants (`Unauthenticated`, `SessionExpired`,
/// `RequestFailed`, `Network`, `Cancelled`) follow the client error taxonomy;
/// the remaining variants cover storage and configuration.
#[derive(Error, Debug, Clone, Serialize)]
pub enum CercleError {
    /// No access token is stored; no request was attempted.
    #[error("Not authenticated: no access token available")]
    Unauthenticated,

    /// The server rejected the access token and the refresh attempt failed.
    /// Session state has been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// The server answered with a non-success status.
    #[error("Request failed with status {status}")]
    RequestFailed {
        status: u16,
        message: Option<String>,
    },

    /// Transport-level failure (connection, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The operation was cancelled before it resolved.
    #[error("Operation cancelled")]
    Cancelled,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CercleError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a RequestFailed error
    pub fn request_failed(status: u16, message: Option<String>) -> Self {
        Self::RequestFailed { status, message }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a JSON Serialization error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a SessionExpired error
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Check if this is an Unauthenticated error
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is a Cancelled error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the HTTP status for `RequestFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error ends the session rather than a single request.
    ///
    /// Terminal errors are reported through navigation to the login screen,
    /// never through a dismissible message.
    pub fn is_session_terminal(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthenticated)
    }

    /// Human-readable text for an inline error message.
    ///
    /// Prefers the server-supplied message and falls back to `Erreur <status>`.
    pub fn user_message(&self) -> String {
        match self {
            Self::RequestFailed {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::RequestFailed { status, .. } => format!("Erreur {}", status),
            Self::Network(message) => message.clone(),
            Self::SessionExpired => "Session expirée".to_string(),
            Self::Unauthenticated => "Non authentifié".to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CercleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CercleError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

impl From<toml::de::Error> for CercleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CercleError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for CercleError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// Conversion from anyhow::Error (used at the binary boundary)
impl From<anyhow::Error> for CercleError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, CercleError>`.
pub type Result<T> = std::result::Result<T, CercleError>;
