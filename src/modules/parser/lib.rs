//! Configuration parsing for Sparqlgate
//!
//! This crate handles parsing of YAML configuration files, validation,
//! and environment variable substitution.

pub mod env;
pub mod validator;
pub mod yaml;

pub use validator::ConfigValidator;
pub use yaml::YamlParser;

use sparqlgate_core::{GatewayError, Model};

/// Parse a configuration file from a path, loading `.env` first
pub fn parse_file(path: &str) -> Result<Model, GatewayError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("Failed to read file '{}': {}", path, e)))?;

    env::load_dotenv();
    parse_string(&content)
}

/// Parse and validate a configuration from a string
pub fn parse_string(content: &str) -> Result<Model, GatewayError> {
    let model = YamlParser::parse(content)?;

    let validator = ConfigValidator::new();
    validator.validate(&model)?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
name: test-gateway
endpoints:
  wikidata:
    url: https://query.wikidata.org/sparql
  dbpedia:
    url: https://dbpedia.org/sparql
"#;
        let model = parse_string(yaml).unwrap();
        assert_eq!(model.name, "test-gateway");
        assert_eq!(model.endpoints.len(), 2);
    }

    #[test]
    fn test_parse_string_runs_validation() {
        let yaml = r#"
endpoints:
  - name: wd
    url: http://a
  - name: wd
    url: http://b
"#;
        assert!(matches!(
            parse_string(yaml),
            Err(GatewayError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoints:\n  local:\n    url: http://localhost:3030/ds/sparql").unwrap();

        let model = parse_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(model.endpoints[0].name, "local");
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file("/nonexistent/sparqlgate.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
