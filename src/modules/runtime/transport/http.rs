//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect, Client};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::request::OutboundRequest;
use super::traits::{Transport, TransportError, TransportResponse};

/// Client settings that can only be fixed at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ClientKey {
    connect_timeout: Duration,
    verify_tls: bool,
}

/// HTTP transport built on reqwest
///
/// One client (and connection pool) is kept per distinct connect-timeout and
/// TLS-verification combination; the whole-request timeout is applied per call.
pub struct HttpTransport {
    clients: Mutex<HashMap<ClientKey, Client>>,
}

impl HttpTransport {
    /// Create a new transport with an empty client cache
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client_for(&self, request: &OutboundRequest) -> Result<Client, TransportError> {
        let key = ClientKey {
            connect_timeout: request.connect_timeout,
            verify_tls: request.verify_tls,
        };

        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        debug!(
            "Building HTTP client (connect timeout {:?}, verify TLS: {})",
            key.connect_timeout, key.verify_tls
        );
        let client = Client::builder()
            .connect_timeout(key.connect_timeout)
            .danger_accept_invalid_certs(!key.verify_tls)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| {
                TransportError::new(format!("Failed to build HTTP client: {}", describe(&e)))
            })?;

        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Number of distinct clients built so far
    pub fn client_count(&self) -> usize {
        self.clients
            .lock()
            .map(|c| c.len())
            .unwrap_or_else(|e| e.into_inner().len())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        let client = self.client_for(request)?;
        let headers = header_map(&request.headers)?;

        let response = client
            .post(&request.url)
            .timeout(request.request_timeout)
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, request.request_timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(&e, request.request_timeout))?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }

    fn transport_type(&self) -> &'static str {
        "http"
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::new(format!("Invalid header name '{}': {}", name, e)))?;
        // Header values may carry credentials, so they stay out of the message
        let value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::new(format!("Invalid value for header '{}'", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn map_reqwest_error(err: &reqwest::Error, request_timeout: Duration) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(format!(
            "Request timed out after {} seconds",
            request_timeout.as_secs()
        ));
    }
    TransportError::new(describe(err))
}

/// Render an error followed by its source chain
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparqlgate_core::EndpointProfile;

    #[test]
    fn test_client_cache_keys_on_policy() {
        let transport = HttpTransport::new();
        let a = OutboundRequest::build(&EndpointProfile::new("a", "http://a"), "");
        let b = OutboundRequest::build(&EndpointProfile::new("b", "http://b"), "");
        let c = OutboundRequest::build(&EndpointProfile::new("c", "http://c").insecure(), "");

        transport.client_for(&a).unwrap();
        transport.client_for(&b).unwrap();
        assert_eq!(transport.client_count(), 1);

        transport.client_for(&c).unwrap();
        assert_eq!(transport.client_count(), 2);
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let headers = vec![("Authorization".to_string(), "Basic a\nb".to_string())];
        let err = header_map(&headers).unwrap_err();
        assert!(err.message.contains("authorization"));
        assert!(!err.message.contains("Basic"));
    }

    #[test]
    fn test_describe_includes_sources() {
        let inner =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        let text = describe(&outer);
        assert!(text.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_malformed_url_is_transport_error() {
        let transport = HttpTransport::new();
        let request = OutboundRequest::build(&EndpointProfile::new("bad", "not a url"), "ASK {}");
        let err = transport.send(&request).await.unwrap_err();
        assert!(!err.message.is_empty());
    }
}
