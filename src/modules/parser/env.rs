//! Environment variable substitution
//!
//! Credentials are usually kept out of the configuration file and referenced
//! as `{{ env.NAME }}` placeholders instead.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sparqlgate_core::GatewayError;

/// Placeholder syntax: {{ env.VAR_NAME }}
static ENV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid env pattern")
});

/// Load a `.env` file from the working directory, if there is one
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Replaces `{{ env.NAME }}` placeholders with values from the process environment
pub struct EnvSubstitutor {
    /// Missing variables are an error when set, left untouched otherwise
    strict: bool,
}

impl EnvSubstitutor {
    /// Fails if any referenced variable is unset
    pub fn new() -> Self {
        Self { strict: true }
    }

    /// Leaves placeholders for unset variables in place
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Substitute every placeholder in `content`.
    ///
    /// In strict mode the error lists all missing variables, not only the first.
    pub fn substitute(&self, content: &str) -> Result<String, GatewayError> {
        let mut missing = Vec::new();
        let substituted = self.expand(content, &mut missing);

        if self.strict && !missing.is_empty() {
            return Err(GatewayError::EnvVarNotFound(missing.join(", ")));
        }

        Ok(substituted)
    }

    /// Substitute placeholders, appending unset variable names to `missing`.
    ///
    /// Placeholders for unset variables are left in place; `strict` is not consulted.
    pub fn expand(&self, content: &str, missing: &mut Vec<String>) -> String {
        ENV_PATTERN
            .replace_all(content, |cap: &Captures| {
                let var_name = &cap[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing.iter().any(|m| m == var_name) {
                            missing.push(var_name.to_string());
                        }
                        cap[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Whether unset variables are an error
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Check if a string contains environment variable placeholders
    pub fn has_placeholders(content: &str) -> bool {
        ENV_PATTERN.is_match(content)
    }

    /// Names of all referenced variables, in order of appearance
    pub fn extract_var_names(content: &str) -> Vec<String> {
        ENV_PATTERN
            .captures_iter(content)
            .map(|cap| cap[1].to_string())
            .collect()
    }
}

impl Default for EnvSubstitutor {
    fn default() -> Self {
        Self::new()
    }
}
