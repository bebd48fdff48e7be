//! Errors raised while loading triage settings

use thiserror::Error;

/// Failure to turn a settings file into a usable [`TriageConfig`](super::TriageConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read triage settings '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Syntax error, unknown key or bad removal pattern. YAML and JSON both
    /// report a location when they have one.
    #[error("cannot parse triage settings '{path}' (line {}, column {}): {message}",
            .line.unwrap_or(0), .column.unwrap_or(0))]
    ParseError {
        path: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error(transparent)]
    ValidationError(#[from] ValidationError),

    /// A `${VAR}` reference with no value in the environment
    #[error("environment variable '{var}' referenced by the settings file is not set")]
    EnvVarNotFound { var: String },
}

/// A parsed setting that the client or normalizer cannot work with
#[derive(Debug, Error)]
#[error("invalid setting '{field_path}': {kind}")]
pub struct ValidationError {
    /// Dotted path of the offending key, e.g. `labels.spam`
    pub field_path: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Error)]
pub enum ValidationErrorKind {
    /// Token, model, section marker or label name is blank
    #[error("must not be empty")]
    Empty,

    #[error("endpoint must be an http or https URL ({reason})")]
    InvalidEndpoint { reason: String },

    /// An excerpt length of zero would discard every issue body
    #[error("must be greater than zero")]
    ZeroLength,
}

impl ValidationError {
    fn new(field_path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field_path: field_path.into(),
            kind,
        }
    }

    pub fn empty(field_path: impl Into<String>) -> Self {
        Self::new(field_path, ValidationErrorKind::Empty)
    }

    pub fn zero_length(field_path: impl Into<String>) -> Self {
        Self::new(field_path, ValidationErrorKind::ZeroLength)
    }

    /// `client.endpoint` failed to parse or uses another scheme
    pub fn invalid_endpoint(reason: impl Into<String>) -> Self {
        Self::new(
            "client.endpoint",
            ValidationErrorKind::InvalidEndpoint {
                reason: reason.into(),
            },
        )
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_the_key() {
        let err = ConfigError::from(ValidationError::empty("labels.spam"));
        assert_eq!(err.to_string(), "invalid setting 'labels.spam': must not be empty");

        let err = ValidationError::invalid_endpoint("unsupported scheme 'ftp'");
        assert_eq!(
            err.to_string(),
            "invalid setting 'client.endpoint': endpoint must be an http or https URL \
             (unsupported scheme 'ftp')"
        );
    }

    #[test]
    fn test_parse_error_reports_location() {
        let err = ConfigError::ParseError {
            path: "triage.json".to_string(),
            line: Some(3),
            column: Some(14),
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse triage settings 'triage.json' (line 3, column 14): expected value"
        );
    }
}
