//! YAML configuration parser

use serde::Deserialize;
use serde_yaml::Value;
use sparqlgate_core::{
    BasicAuth, EndpointProfile, GatewayError, Model, ServerConfig, DEFAULT_CONNECTION_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use std::collections::BTreeMap;

use crate::env::EnvSubstitutor;

/// YAML parser for Sparqlgate configuration files
pub struct YamlParser;

/// Top-level file layout. `endpoints` is kept untyped so both the map form
/// (keyed by endpoint name) and the list form can be decoded with precise errors.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    endpoints: Option<Value>,

    #[serde(default)]
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    /// Required in list form, ignored in map form where the key is the name
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default, rename = "connectionTimeout", alias = "connection_timeout")]
    connection_timeout: Option<u64>,

    #[serde(default, rename = "requestTimeout", alias = "request_timeout")]
    request_timeout: Option<u64>,

    #[serde(
        default,
        rename = "verifySSLCertificate",
        alias = "verify_ssl_certificate"
    )]
    verify_ssl_certificate: Option<bool>,

    #[serde(default, rename = "basicAuth", alias = "basic_auth")]
    basic_auth: Option<RawBasicAuth>,
}

/// Scalars are accepted for both fields so an all-digit password needs no quoting
#[derive(Debug, Default, Deserialize)]
struct RawBasicAuth {
    #[serde(default)]
    user: Option<Value>,

    #[serde(default)]
    password: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    #[serde(default)]
    host: Option<Value>,

    #[serde(default)]
    port: Option<Value>,
}

impl YamlParser {
    /// Parse a YAML string into a Model, substituting `{{ env.* }}` placeholders
    pub fn parse(content: &str) -> Result<Model, GatewayError> {
        Self::parse_with(content, Some(&EnvSubstitutor::new()))
    }

    /// Parse a YAML string without environment variable substitution
    pub fn parse_raw(content: &str) -> Result<Model, GatewayError> {
        Self::parse_with(content, None)
    }

    fn parse_with(
        content: &str,
        substitutor: Option<&EnvSubstitutor>,
    ) -> Result<Model, GatewayError> {
        if content.trim().is_empty() {
            return Ok(Model::default());
        }

        let mut document: Value = serde_yaml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("YAML parse error: {}", e)))?;

        // Substitution runs on parsed string values, so secrets containing
        // YAML syntax cannot change the document structure.
        if let Some(substitutor) = substitutor {
            let mut missing = Vec::new();
            substitute_strings(&mut document, substitutor, &mut missing);
            if substitutor.is_strict() && !missing.is_empty() {
                return Err(GatewayError::EnvVarNotFound(missing.join(", ")));
            }
        }

        if document.is_null() {
            return Ok(Model::default());
        }

        let raw: RawConfig = serde_yaml::from_value(document)
            .map_err(|e| GatewayError::Config(format!("YAML parse error: {}", e)))?;
        raw_to_model(raw)
    }
}

fn substitute_strings(value: &mut Value, substitutor: &EnvSubstitutor, missing: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if EnvSubstitutor::has_placeholders(s) {
                *s = substitutor.expand(s, missing);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                substitute_strings(item, substitutor, missing);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                substitute_strings(item, substitutor, missing);
            }
        }
        Value::Tagged(tagged) => substitute_strings(&mut tagged.value, substitutor, missing),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn raw_to_model(cfg: RawConfig) -> Result<Model, GatewayError> {
    let endpoints = match cfg.endpoints {
        None | Some(Value::Null) => Vec::new(),
        Some(value @ Value::Mapping(_)) => {
            let entries: BTreeMap<String, RawEndpoint> = serde_yaml::from_value(value)
                .map_err(|e| GatewayError::Config(format!("Invalid 'endpoints' map: {}", e)))?;
            entries
                .into_iter()
                .map(|(name, raw)| raw_to_profile(name, raw))
                .collect::<Result<Vec<_>, _>>()?
        }
        Some(value @ Value::Sequence(_)) => {
            let entries: Vec<RawEndpoint> = serde_yaml::from_value(value)
                .map_err(|e| GatewayError::Config(format!("Invalid 'endpoints' list: {}", e)))?;
            entries
                .into_iter()
                .enumerate()
                .map(|(idx, mut raw)| {
                    let name = raw.name.take().ok_or_else(|| {
                        GatewayError::Config(format!("Endpoint #{} is missing 'name'", idx + 1))
                    })?;
                    raw_to_profile(name, raw)
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        Some(_) => {
            return Err(GatewayError::Config(
                "'endpoints' must be a map or a list".to_string(),
            ))
        }
    };

    let server = cfg.server.map(|s| ServerConfig {
        host: s.host.and_then(yaml_scalar_to_string),
        port: s.port.and_then(yaml_scalar_to_string),
    });

    let mut model = Model::default();
    if let Some(name) = cfg.name {
        model.name = name;
    }
    model.endpoints = endpoints;
    model.server = server;
    Ok(model)
}

fn raw_to_profile(name: String, raw: RawEndpoint) -> Result<EndpointProfile, GatewayError> {
    let url = raw
        .url
        .ok_or_else(|| GatewayError::Config(format!("Endpoint '{}' is missing 'url'", name)))?;

    // A present block with absent fields still yields credentials; the
    // missing side is sent as an empty string.
    let credentials = raw.basic_auth.map(|auth| BasicAuth {
        user: auth.user.and_then(yaml_scalar_to_string),
        password: auth.password.and_then(yaml_scalar_to_string),
    });

    Ok(EndpointProfile {
        name,
        url,
        connection_timeout_secs: raw
            .connection_timeout
            .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
        request_timeout_secs: raw.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        verify_ssl_certificate: raw.verify_ssl_certificate.unwrap_or(true),
        credentials,
    })
}

fn yaml_scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        other => serde_yaml::to_string(&other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}
