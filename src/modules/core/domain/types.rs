//! Additional configuration types

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: 0.0.0.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port to listen on (default: 8080)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Some("0.0.0.0".to_string()),
            port: Some("8080".to_string()),
        }
    }
}
