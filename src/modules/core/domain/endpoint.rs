//! Remote endpoint profiles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Connect-phase timeout applied when the configuration omits one
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 10;

/// Whole-request timeout applied when the configuration omits one
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection profile for one named remote query service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointProfile {
    /// Case-sensitive registry key
    pub name: String,

    /// Target URL. Not validated; a malformed URL fails at request time.
    pub url: String,

    /// Bound on the TCP/TLS connect phase, in seconds
    #[serde(
        rename = "connectionTimeout",
        alias = "connection_timeout",
        default = "default_connection_timeout"
    )]
    pub connection_timeout_secs: u64,

    /// Bound on the whole request including connect, in seconds
    #[serde(
        rename = "requestTimeout",
        alias = "request_timeout",
        default = "default_request_timeout"
    )]
    pub request_timeout_secs: u64,

    /// When false, TLS certificates are not validated at all
    #[serde(
        rename = "verifySSLCertificate",
        alias = "verify_ssl_certificate",
        default = "default_verify_ssl"
    )]
    pub verify_ssl_certificate: bool,

    /// HTTP Basic credentials; `None` means no Authorization header
    #[serde(
        rename = "basicAuth",
        alias = "basic_auth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credentials: Option<BasicAuth>,
}

fn default_connection_timeout() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_verify_ssl() -> bool {
    true
}

impl EndpointProfile {
    /// Create a profile with default timeouts, TLS verification and no credentials
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            verify_ssl_certificate: true,
            credentials: None,
        }
    }

    /// Set the connect and whole-request timeouts, in seconds
    pub fn with_timeouts(mut self, connection_secs: u64, request_secs: u64) -> Self {
        self.connection_timeout_secs = connection_secs;
        self.request_timeout_secs = request_secs;
        self
    }

    pub fn with_credentials(mut self, credentials: BasicAuth) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Disable TLS certificate verification for this endpoint
    pub fn insecure(mut self) -> Self {
        self.verify_ssl_certificate = false;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Basic authentication block. Either side may be absent and then encodes as "".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl BasicAuth {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    /// Credentials carrying only a password
    pub fn password_only(password: impl Into<String>) -> Self {
        Self {
            user: None,
            password: Some(password.into()),
        }
    }

    /// The `user:password` pair as sent on the wire, before base64 encoding
    pub fn userpass(&self) -> String {
        format!(
            "{}:{}",
            self.user.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
