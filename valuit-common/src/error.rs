//! Error types for the ValuIt workspace.

use thiserror::Error;

/// Result type alias using the ValuIt error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for ValuIt components.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model parameter is outside its valid domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External collaborator (market data, peer lookup) failed
    #[error("External service error: {0}")]
    External(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid-parameter error from a message.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create an external-service error from a message.
    pub fn external(msg: impl Into<String>) -> Self {
        Self::External(msg.into())
    }
}
