//! Runtime type definitions for request/response handling

use serde::{Deserialize, Serialize};

use crate::outcome::{FailureKind, QueryFailure};

/// Query execution request, accepted as query string, form body or JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Name of the configured endpoint to query
    #[serde(default, rename = "endpointName", alias = "endpoint_name")]
    pub endpoint_name: String,

    /// Opaque query text, forwarded untouched
    #[serde(default)]
    pub query: String,
}

/// Successful query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub sparqlresult: serde_json::Value,
}

impl QueryResponse {
    pub fn new(sparqlresult: serde_json::Value) -> Self {
        Self { sparqlresult }
    }
}

/// Error envelope returned by the HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details: machine-readable code, human-readable info and the remote status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub httpcode: Option<u16>,
}

impl ErrorResponse {
    /// Create an error response without an HTTP status
    pub fn new(code: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                info: info.into(),
                httpcode: None,
            },
        }
    }

    /// A required parameter was absent or empty
    pub fn missing_param(param: &str) -> Self {
        Self::new(
            error_codes::MISSING_PARAM,
            format!("The \"{}\" parameter must be set.", param),
        )
    }
}

impl From<&QueryFailure> for ErrorResponse {
    fn from(failure: &QueryFailure) -> Self {
        let info = match failure.kind {
            FailureKind::EndpointNotFound => {
                format!("SPARQL endpoint \"{}\" is not configured.", failure.message)
            }
            FailureKind::TransportError | FailureKind::HttpError => {
                format!("SPARQL query failed: {}", failure.message)
            }
        };

        Self {
            error: ErrorBody {
                code: failure.code().to_string(),
                info,
                httpcode: Some(failure.http_status),
            },
        }
    }
}

/// Error codes exposed by the HTTP surface
pub mod error_codes {
    pub use crate::outcome::{ENDPOINT_NOT_FOUND, QUERY_FAILED};

    /// A required request parameter is missing
    pub const MISSING_PARAM: &str = "missing-param";

    /// The request body could not be decoded
    pub const INVALID_REQUEST: &str = "invalid-request";
}
