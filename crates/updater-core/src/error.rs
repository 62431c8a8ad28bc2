//! Error types for the Project Updater.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire updater.
///
/// Only failures the core cannot classify locally end up here. Expected
/// outcomes (a rejected credential, an expired session, a declined
/// confirmation) are returned as values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdaterError {
    /// Unexpected failure talking to the backend (network down, 5xx, bad payload)
    #[error("Transport fault{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    TransportFault {
        status: Option<u16>,
        message: String,
    },

    /// The bearer token cookie is absent
    #[error("Token missing: cookie '{cookie}' is not set")]
    TokenMissing { cookie: String },

    /// A positional edit addressed an index outside the current list
    #[error("Index {index} out of range for {list} (len {len})")]
    IndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },

    /// IO error (reading attachments, config files)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UpdaterError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a TransportFault error
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::TransportFault {
            status,
            message: message.into(),
        }
    }

    /// Creates a TokenMissing error
    pub fn token_missing(cookie: impl Into<String>) -> Self {
        Self::TokenMissing {
            cookie: cookie.into(),
        }
    }

    /// Creates an IndexOutOfRange error
    pub fn index_out_of_range(list: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { list, index, len }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
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

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a transport fault
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFault { .. })
    }

    /// Check if the backend answered with the given HTTP status
    pub fn has_status(&self, code: u16) -> bool {
        matches!(self, Self::TransportFault { status: Some(s), .. } if *s == code)
    }

    /// Check if this is a TokenMissing error
    pub fn is_token_missing(&self) -> bool {
        matches!(self, Self::TokenMissing { .. })
    }

    /// Check if this is an IndexOutOfRange error
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for UpdaterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for UpdaterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for UpdaterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for UpdaterError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for adapters that bubble anyhow up)
impl From<anyhow::Error> for UpdaterError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, UpdaterError>`.
pub type Result<T> = std::result::Result<T, UpdaterError>;
