//! Error types for Sparqlgate
//!
//! The gateway itself never returns this type: query-time failures are
//! classified into a `QueryOutcome`. `QueryFailed` exists for callers that
//! want to propagate such a failure with `?`.

use sparqlgate_types::QueryFailure;
use thiserror::Error;

/// Main error type for Sparqlgate operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration file reading or parsing error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Environment variable referenced by the configuration is not set
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A classified gateway failure propagated by a caller
    #[error("Query failed: {0}")]
    QueryFailed(#[from] QueryFailure),

    /// Internal error (file watcher setup and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns true if the error stems from the configuration file or environment
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GatewayError::Config(_) | GatewayError::Validation(_) | GatewayError::EnvVarNotFound(_)
        )
    }
}

/// Result type alias using GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;
