//! Root model configuration

use serde::{Deserialize, Serialize};

use super::{EndpointProfile, ServerConfig};

/// Root configuration model that represents a Sparqlgate configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Name of the gateway deployment
    #[serde(default = "default_name")]
    pub name: String,

    /// Remote endpoint profiles
    #[serde(default)]
    pub endpoints: Vec<EndpointProfile>,

    /// Server configuration (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

fn default_name() -> String {
    "sparqlgate".to_string()
}

impl Model {
    /// Create a new empty model with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: Vec::new(),
            server: None,
        }
    }

    /// Add an endpoint profile
    pub fn with_endpoint(mut self, endpoint: EndpointProfile) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Find an endpoint by exact name
    pub fn find_endpoint(&self, name: &str) -> Option<&EndpointProfile> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Get the server port, defaulting to 8080
    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port.as_ref())
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080)
    }

    /// Get the bind host, defaulting to all interfaces
    pub fn host(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.host.as_deref())
            .unwrap_or("0.0.0.0")
    }

    /// Longest whole-request timeout across all endpoints, in seconds
    pub fn max_request_timeout_secs(&self) -> u64 {
        self.endpoints
            .iter()
            .map(|e| e.request_timeout_secs)
            .max()
            .unwrap_or(0)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(default_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_new() {
        let model = Model::new("wiki-sparql");
        assert_eq!(model.name, "wiki-sparql");
        assert!(model.endpoints.is_empty());
    }

    #[test]
    fn test_model_default_port_and_host() {
        let model = Model::default();
        assert_eq!(model.port(), 8080);
        assert_eq!(model.host(), "0.0.0.0");
    }

    #[test]
    fn test_model_custom_port() {
        let model = Model {
            name: "test".to_string(),
            endpoints: Vec::new(),
            server: Some(ServerConfig {
                host: Some("127.0.0.1".to_string()),
                port: Some("3000".to_string()),
            }),
        };
        assert_eq!(model.port(), 3000);
        assert_eq!(model.host(), "127.0.0.1");
    }

    #[test]
    fn test_find_endpoint_is_case_sensitive() {
        let model = Model::default()
            .with_endpoint(EndpointProfile::new("Wikidata", "https://query.wikidata.org/sparql"));
        assert!(model.find_endpoint("Wikidata").is_some());
        assert!(model.find_endpoint("wikidata").is_none());
    }

    #[test]
    fn test_max_request_timeout() {
        let model = Model::default()
            .with_endpoint(EndpointProfile::new("a", "http://a").with_timeouts(5, 20))
            .with_endpoint(EndpointProfile::new("b", "http://b").with_timeouts(5, 90));
        assert_eq!(model.max_request_timeout_secs(), 90);
        assert_eq!(Model::default().max_request_timeout_secs(), 0);
    }
}
