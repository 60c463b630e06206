//! Query outcome definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error code reported when the endpoint name is not registered
pub const ENDPOINT_NOT_FOUND: &str = "endpoint-not-found";

/// Error code reported for every failure after the endpoint was resolved
pub const QUERY_FAILED: &str = "query-failed";

/// Classification of a failed gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The endpoint name is absent from the registry; no network call was made
    EndpointNotFound,
    /// DNS, connect, TLS, timeout or malformed URL failure; no HTTP response
    TransportError,
    /// The remote service answered with a status >= 400
    HttpError,
}

impl FailureKind {
    /// Machine-readable code exposed to callers
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::EndpointNotFound => ENDPOINT_NOT_FOUND,
            FailureKind::TransportError | FailureKind::HttpError => QUERY_FAILED,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::EndpointNotFound => write!(f, "endpoint not found"),
            FailureKind::TransportError => write!(f, "transport error"),
            FailureKind::HttpError => write!(f, "http error"),
        }
    }
}

/// A classified failure. `http_status` is 0 whenever no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub message: String,
    pub http_status: u16,
}

impl QueryFailure {
    pub fn endpoint_not_found(endpoint_name: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::EndpointNotFound,
            message: endpoint_name.into(),
            http_status: 0,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::TransportError,
            message: message.into(),
            http_status: 0,
        }
    }

    pub fn http(status: u16) -> Self {
        Self {
            kind: FailureKind::HttpError,
            message: format!("HTTP {}", status),
            http_status: status,
        }
    }

    /// Shorthand for `self.kind.code()`
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Result of a single gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Decoded response payload, passed through without a schema
    Success { data: serde_json::Value },
    Failure(QueryFailure),
}

impl QueryOutcome {
    pub fn success(data: serde_json::Value) -> Self {
        QueryOutcome::Success { data }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success { .. })
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&QueryFailure> {
        match self {
            QueryOutcome::Failure(failure) => Some(failure),
            QueryOutcome::Success { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<serde_json::Value, QueryFailure> {
        match self {
            QueryOutcome::Success { data } => Ok(data),
            QueryOutcome::Failure(failure) => Err(failure),
        }
    }
}

impl From<QueryFailure> for QueryOutcome {
    fn from(failure: QueryFailure) -> Self {
        QueryOutcome::Failure(failure)
    }
}
