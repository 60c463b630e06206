//! Transport trait definition

use async_trait::async_trait;
use thiserror::Error;

use super::request::OutboundRequest;

/// Raw response from the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// No HTTP response was obtained: DNS, connect, TLS, timeout or URL failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trait for outbound transports
///
/// Implementations perform exactly one attempt per call and must honour the
/// request's connect timeout, whole-request timeout and TLS verification flag.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the full response body
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError>;

    /// Get the transport type name
    fn transport_type(&self) -> &'static str;
}
