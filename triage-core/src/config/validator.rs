//! Configuration validation utilities

use super::error::ValidationError;
use super::schema::TriageConfig;
use url::Url;

/// Checks a loaded configuration before it is handed to the client and
/// normalizer
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a configuration, reporting the first offending field
    pub fn validate(&self, config: &TriageConfig) -> Result<(), ValidationError> {
        self.validate_client(config)?;
        self.validate_normalization(config)?;
        self.validate_labels(config)?;
        Ok(())
    }

    fn validate_client(&self, config: &TriageConfig) -> Result<(), ValidationError> {
        let client = &config.client;

        if client.token.is_blank() {
            return Err(ValidationError::empty("client.token"));
        }
        if client.model.trim().is_empty() {
            return Err(ValidationError::empty("client.model"));
        }

        let url = Url::parse(&client.endpoint)
            .map_err(|e| ValidationError::invalid_endpoint(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::invalid_endpoint(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }

    fn validate_normalization(&self, config: &TriageConfig) -> Result<(), ValidationError> {
        let normalization = &config.normalization;

        for (field, value) in [
            ("feature_section_title", &normalization.feature_section_title),
            ("reproduction_section_title", &normalization.reproduction_section_title),
            ("logs_section_title", &normalization.logs_section_title),
        ] {
            if value.is_empty() {
                return Err(ValidationError::empty(format!("normalization.{field}")));
            }
        }

        if normalization.max_content_length == 0 {
            return Err(ValidationError::zero_length(
                "normalization.max_content_length",
            ));
        }

        Ok(())
    }

    fn validate_labels(&self, config: &TriageConfig) -> Result<(), ValidationError> {
        let labels = &config.labels;
        for (field, value) in [
            ("needs_reproduction", &labels.needs_reproduction),
            ("possible_regression", &labels.possible_regression),
            ("pending_triage", &labels.pending_triage),
            ("nitro", &labels.nitro),
            ("spam", &labels.spam),
            ("duplicate", &labels.duplicate),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::empty(format!("labels.{field}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ValidationErrorKind;
    use crate::config::SecretString;

    fn valid_config() -> TriageConfig {
        let mut config = TriageConfig::default();
        config.client.token = SecretString::new("ghp_test_token_value");
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::new().validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_token() {
        let err = ConfigValidator::new()
            .validate(&TriageConfig::default())
            .unwrap_err();
        assert_eq!(err.field_path, "client.token");
        assert!(matches!(err.kind, ValidationErrorKind::Empty));
    }

    #[test]
    fn test_bad_endpoint() {
        let mut config = valid_config();
        config.client.endpoint = "not a url".to_string();
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "client.endpoint");

        config.client.endpoint = "ftp://models.example.com/chat".to_string();
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_zero_max_length() {
        let mut config = valid_config();
        config.normalization.max_content_length = 0;
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "normalization.max_content_length");
        assert!(matches!(err.kind, ValidationErrorKind::ZeroLength));
    }

    #[test]
    fn test_empty_marker_and_label() {
        let mut config = valid_config();
        config.normalization.logs_section_title.clear();
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "normalization.logs_section_title");

        let mut config = valid_config();
        config.labels.spam = " ".to_string();
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "labels.spam");
    }
}
