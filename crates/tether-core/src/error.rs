//! Error types for Tether.
//!
//! Every failure a controller call can produce surfaces as a `TetherError`.
//! Backend-reported failures keep the backend's message verbatim so callers
//! can show it as-is.

use std::net::SocketAddr;
use thiserror::Error;

/// Main error type for the Tether library.
#[derive(Debug, Error)]
pub enum TetherError {
    // Backend-reported failures
    #[error("{message}")]
    Backend {
        message: String,
        /// Error code when the backend sent a structured error object
        code: Option<i32>,
    },

    // Contract violations by the backend
    #[error("Malformed response envelope for {method}: neither error nor result present")]
    MalformedEnvelope { method: String },

    #[error("Unexpected payload for {method}: {message}")]
    UnexpectedPayload { method: String, message: String },

    // Transport errors
    #[error("IPC connection to {addr} lost")]
    ConnectionLost { addr: SocketAddr },

    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Request errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Tether operations.
pub type Result<T> = std::result::Result<T, TetherError>;

impl From<std::io::Error> for TetherError {
    fn from(err: std::io::Error) -> Self {
        TetherError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for TetherError {
    fn from(err: serde_json::Error) -> Self {
        TetherError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl TetherError {
    /// Build a backend failure from an envelope's error descriptor.
    pub fn backend(message: impl Into<String>, code: Option<i32>) -> Self {
        TetherError::Backend {
            message: message.into(),
            code,
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32601: Method not found
    /// - -32602: Invalid params
    /// - -32603: Internal error
    ///
    /// Custom error codes:
    /// - -32005: Validation error
    /// - backend failures keep the code they arrived with
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            TetherError::MethodNotFound { .. } => -32601,
            TetherError::InvalidParams { .. } => -32602,
            TetherError::Validation { .. } => -32005,
            TetherError::Backend {
                code: Some(code), ..
            } => *code,
            _ => -32603,
        }
    }

    /// Whether the failure happened below the envelope, in the bridge itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TetherError::ConnectionLost { .. } | TetherError::Io { .. } | TetherError::Json { .. }
        )
    }
}
