//! Error types for outline_eval
//!
//! Malformed or empty outlines are never errors — they degrade to
//! neutral metric values. Errors are reserved for the embedding oracle
//! failing mid-evaluation and for invalid threshold configuration, which
//! is rejected before any metric runs.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EvalError>;

/// Main error type for outline_eval
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// The embedding oracle failed or returned a malformed response.
    /// Terminal for the whole evaluation — no partial scoring is attempted.
    #[error("Embedding failure: {message}")]
    Embedding { message: String },

    /// A threshold override was rejected at resolution time
    #[error("Invalid threshold: {message}")]
    InvalidThreshold { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EvalError {
    /// Create an embedding failure error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create an invalid threshold error
    pub fn invalid_threshold(message: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error came from the embedding oracle
    pub fn is_embedding_failure(&self) -> bool {
        matches!(self, Self::Embedding { .. })
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
