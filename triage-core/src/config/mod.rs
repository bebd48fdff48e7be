//! Configuration module
//!
//! Settings for the completion client, the content normalizer and the label
//! names used downstream. Values come from defaults, an optional YAML or JSON
//! file with `${VAR}` interpolation, and environment-style overrides.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{interpolate_env_vars, interpolate_with, keys, process_env};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{
    ClientConfig, LabelConfig, NormalizationConfig, TriageConfig, DEFAULT_FEATURE_SECTION_TITLE,
    DEFAULT_LOGS_SECTION_TITLE, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_REPRODUCTION_SECTION_TITLE,
};
pub use secrets::SecretString;
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<TriageConfig> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path)?;

    let config: TriageConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    finish(path, config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<TriageConfig> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path)?;

    let config: TriageConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    finish(path, config)
}

fn read_interpolated(path: &Path) -> ConfigResult<String> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    interpolate_env_vars(&content)
}

/// Apply environment overrides, then validate
fn finish(path: &Path, mut config: TriageConfig) -> ConfigResult<TriageConfig> {
    config.apply_overrides(process_env);

    ConfigValidator::new().validate(&config)?;
    debug!(
        path = %path.display(),
        token = %config.client.token.partial_redact(),
        model = %config.client.model,
        max_content_length = config.normalization.max_content_length,
        "Loaded triage configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_sections() {
        let yaml = r#"
client:
  token: ghp_example_token
  model: openai/gpt-4.1-mini
  max_retries: 5
normalization:
  max_content_length: 2000
  removal_patterns:
    - 'https://example\.com/\S*'
labels:
  spam: invalid
"#;
        let config: TriageConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.client.model, "openai/gpt-4.1-mini");
        assert_eq!(config.client.max_retries, 5);
        assert_eq!(config.client.retry_delay_ms, 1000);
        assert_eq!(config.normalization.max_content_length, 2000);
        assert_eq!(config.normalization.removal_patterns.len(), 1);
        assert_eq!(
            config.normalization.feature_section_title,
            DEFAULT_FEATURE_SECTION_TITLE
        );
        assert_eq!(config.labels.spam, "invalid");
        assert_eq!(config.labels.duplicate, "duplicate");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<TriageConfig, _> = serde_yaml::from_str("client:\n  tokn: x\n");
        assert!(result.is_err());
    }
}
