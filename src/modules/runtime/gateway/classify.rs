//! Outcome classification

use serde_json::Value;
use sparqlgate_types::{QueryFailure, QueryOutcome};
use tracing::warn;

use crate::transport::{TransportError, TransportResponse};

/// Map a transport result onto a `QueryOutcome`
///
/// Statuses of 400 and above are failures and their bodies are discarded.
/// Anything below 400 is a success, including redirects that were not followed.
pub fn classify(result: Result<TransportResponse, TransportError>) -> QueryOutcome {
    match result {
        Err(e) => QueryFailure::transport(e.message).into(),
        Ok(response) if response.status >= 400 => QueryFailure::http(response.status).into(),
        Ok(response) => QueryOutcome::success(decode_payload(response.status, &response.body)),
    }
}

/// Decode a success body, passing `null` through when it is not JSON
pub fn decode_payload(status: u16, body: &[u8]) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "HTTP {} response body is not valid JSON ({} bytes): {}; returning null",
                status,
                body.len(),
                e
            );
            Value::Null
        }
    }
}
