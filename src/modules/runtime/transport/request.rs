//! Outbound request construction

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sparqlgate_core::{BasicAuth, EndpointProfile};
use std::time::Duration;

/// Identifying user agent sent with every outbound query
pub const USER_AGENT: &str = concat!("Sparqlgate/", env!("CARGO_PKG_VERSION"));

/// Content type of the form-encoded request body
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Requested response format
pub const ACCEPT_SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// A fully specified outbound HTTP POST, described as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form-urlencoded body: `query=<encoded query>`
    pub body: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub verify_tls: bool,
}

impl OutboundRequest {
    /// Build the request for `query` against `profile`
    pub fn build(profile: &EndpointProfile, query: &str) -> Self {
        let mut headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE_FORM.to_string()),
            ("Accept".to_string(), ACCEPT_SPARQL_RESULTS_JSON.to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];

        if let Some(credentials) = &profile.credentials {
            headers.push(("Authorization".to_string(), basic_auth_value(credentials)));
        }

        Self {
            url: profile.url.clone(),
            headers,
            body: encode_query_form(query),
            connect_timeout: profile.connection_timeout(),
            request_timeout: profile.request_timeout(),
            verify_tls: profile.verify_ssl_certificate,
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Encode the query text as the single form field `query`
pub fn encode_query_form(query: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("query", query)
        .finish()
}

/// `Basic <base64("user:password")>`, with an absent side encoded as ""
pub fn basic_auth_value(credentials: &BasicAuth) -> String {
    format!("Basic {}", STANDARD.encode(credentials.userpass()))
}
