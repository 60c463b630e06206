//! Configuration validation

use once_cell::sync::Lazy;
use regex::Regex;
use sparqlgate_core::{EndpointProfile, GatewayError, Model};
use std::collections::HashSet;

/// Regex pattern for valid model names (lower-kebab-case or lower_snake_case)
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*(?:[-_][a-z0-9]+)*$").expect("valid name pattern")
});

/// Configuration validator
///
/// Endpoint URLs are deliberately not checked for well-formedness; a bad URL
/// surfaces as a transport failure on the first query.
pub struct ConfigValidator {
    /// Whether to validate the model name strictly
    strict_names: bool,
}

impl ConfigValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self { strict_names: true }
    }

    /// Create a validator with lenient name checking
    pub fn lenient() -> Self {
        Self {
            strict_names: false,
        }
    }

    /// Validate the entire model configuration
    pub fn validate(&self, model: &Model) -> Result<(), GatewayError> {
        self.validate_model_name(&model.name)?;
        self.validate_endpoints(model)?;
        Ok(())
    }

    /// Non-fatal findings an operator should know about
    pub fn warnings(&self, model: &Model) -> Vec<String> {
        model.endpoints.iter().flat_map(endpoint_warnings).collect()
    }

    fn validate_model_name(&self, name: &str) -> Result<(), GatewayError> {
        if name.is_empty() {
            return Err(GatewayError::Validation(
                "Model name cannot be empty".to_string(),
            ));
        }

        if self.strict_names && !NAME_PATTERN.is_match(name) {
            return Err(GatewayError::Validation(format!(
                "Invalid model name '{}': must be lower-kebab-case or lower_snake_case",
                name
            )));
        }

        Ok(())
    }

    fn validate_endpoints(&self, model: &Model) -> Result<(), GatewayError> {
        let mut names = HashSet::new();

        for endpoint in &model.endpoints {
            if endpoint.name.is_empty() {
                return Err(GatewayError::Validation(
                    "Endpoint name cannot be empty".to_string(),
                ));
            }

            // Lookups are exact, so "wd " would be unreachable as "wd"
            if endpoint.name.trim() != endpoint.name {
                return Err(GatewayError::Validation(format!(
                    "Endpoint name '{}' has leading or trailing whitespace",
                    endpoint.name
                )));
            }

            if !names.insert(endpoint.name.as_str()) {
                return Err(GatewayError::Validation(format!(
                    "Duplicate endpoint name: '{}'",
                    endpoint.name
                )));
            }

            if endpoint.url.trim().is_empty() {
                return Err(GatewayError::Validation(format!(
                    "Endpoint '{}' has an empty URL",
                    endpoint.name
                )));
            }
        }

        Ok(())
    }
}

fn endpoint_warnings(endpoint: &EndpointProfile) -> Vec<String> {
    let mut warnings = Vec::new();

    if endpoint.connection_timeout_secs == 0 || endpoint.request_timeout_secs == 0 {
        warnings.push(format!(
            "Endpoint '{}' has a zero timeout; every request will fail immediately",
            endpoint.name
        ));
    }

    if endpoint.request_timeout_secs < endpoint.connection_timeout_secs {
        warnings.push(format!(
            "Endpoint '{}': requestTimeout ({}s) is shorter than connectionTimeout ({}s)",
            endpoint.name, endpoint.request_timeout_secs, endpoint.connection_timeout_secs
        ));
    }

    if !endpoint.verify_ssl_certificate {
        warnings.push(format!(
            "Endpoint '{}' has TLS certificate verification disabled",
            endpoint.name
        ));
    }

    warnings
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
