//! Configuration schema structures with serde support

use super::env::{self, keys};
use super::secrets::SecretString;
use crate::completion::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::completion::retry::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default cap on normalized content, in characters
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 5000;

pub const DEFAULT_FEATURE_SECTION_TITLE: &str = "### Describe the feature";
pub const DEFAULT_REPRODUCTION_SECTION_TITLE: &str = "### Reproduction";
pub const DEFAULT_LOGS_SECTION_TITLE: &str = "### Logs";

/// Starter-template links that carry no information about the issue
const DEFAULT_REMOVAL_PATTERNS: &[&str] = &[
    r"https?://stackblitz\.com/github/nuxt/starter/[^\s)]*",
    r"https?://codesandbox\.io/(?:p/)?(?:s/)?github/nuxt/starter/[^\s)]*",
];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriageConfig {
    /// Completion client settings
    pub client: ClientConfig,

    /// Content normalization settings
    pub normalization: NormalizationConfig,

    /// Label names used by downstream collaborators
    pub labels: LabelConfig,
}

impl TriageConfig {
    /// Apply environment-style overrides on top of the loaded values
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.normalization.apply_overrides(&lookup);
        self.labels.apply_overrides(&lookup);
    }
}

/// Completion client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Bearer token for the inference endpoint (supports `${VAR}` interpolation)
    pub token: SecretString,

    /// Model used when a request carries no override
    pub model: String,

    /// Chat-completions URL
    pub endpoint: String,

    /// Retries after the initial attempt
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles per retry
    pub retry_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: SecretString::default(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Settings for `normalize`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationConfig {
    /// Heading that starts a feature request body
    pub feature_section_title: String,

    /// Heading that starts the reproduction steps of a bug report
    pub reproduction_section_title: String,

    /// Heading that starts pasted logs
    pub logs_section_title: String,

    /// Upper bound on the normalized output, in characters
    pub max_content_length: usize,

    /// Patterns removed from the text, in order, all occurrences
    #[serde(with = "regex_list")]
    pub removal_patterns: Vec<Regex>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            feature_section_title: DEFAULT_FEATURE_SECTION_TITLE.to_string(),
            reproduction_section_title: DEFAULT_REPRODUCTION_SECTION_TITLE.to_string(),
            logs_section_title: DEFAULT_LOGS_SECTION_TITLE.to_string(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            removal_patterns: default_removal_patterns(),
        }
    }
}

impl NormalizationConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(env::process_env)
    }

    /// Defaults overridden by an arbitrary key/value source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(&lookup);
        config
    }

    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    pub fn with_removal_patterns(mut self, removal_patterns: Vec<Regex>) -> Self {
        self.removal_patterns = removal_patterns;
        self
    }

    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_string(lookup, keys::FEATURE_SECTION_TITLE, &mut self.feature_section_title);
        override_string(
            lookup,
            keys::REPRODUCTION_SECTION_TITLE,
            &mut self.reproduction_section_title,
        );
        override_string(lookup, keys::LOGS_SECTION_TITLE, &mut self.logs_section_title);

        if let Some(raw) = lookup(keys::MAX_CONTENT_LENGTH) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => self.max_content_length = value,
                _ => warn!(
                    key = keys::MAX_CONTENT_LENGTH,
                    value = %raw,
                    "Ignoring invalid max content length override"
                ),
            }
        }
    }
}

/// Label names applied by downstream collaborators
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub needs_reproduction: String,
    pub possible_regression: String,
    pub pending_triage: String,
    pub nitro: String,
    pub spam: String,
    pub duplicate: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            needs_reproduction: "needs reproduction".to_string(),
            possible_regression: "possible regression".to_string(),
            pending_triage: "pending triage".to_string(),
            nitro: "nitro".to_string(),
            spam: "spam".to_string(),
            duplicate: "duplicate".to_string(),
        }
    }
}

impl LabelConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut labels = Self::default();
        labels.apply_overrides(&lookup);
        labels
    }

    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_string(lookup, keys::LABEL_NEEDS_REPRODUCTION, &mut self.needs_reproduction);
        override_string(lookup, keys::LABEL_POSSIBLE_REGRESSION, &mut self.possible_regression);
        override_string(lookup, keys::LABEL_PENDING_TRIAGE, &mut self.pending_triage);
        override_string(lookup, keys::LABEL_NITRO, &mut self.nitro);
        override_string(lookup, keys::LABEL_SPAM, &mut self.spam);
        override_string(lookup, keys::LABEL_DUPLICATE, &mut self.duplicate);
    }
}

fn override_string<F>(lookup: &F, key: &str, target: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
        *target = value;
    }
}

fn default_removal_patterns() -> Vec<Regex> {
    DEFAULT_REMOVAL_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

/// Serialize compiled patterns as their source strings
mod regex_list {
    use regex::Regex;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(patterns: &[Regex], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(patterns.iter().map(Regex::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Regex>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .map_err(|e| D::Error::custom(format!("invalid removal pattern '{pattern}': {e}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_normalization_defaults() {
        let config = NormalizationConfig::default();
        assert_eq!(config.max_content_length, 5000);
        assert_eq!(config.feature_section_title, DEFAULT_FEATURE_SECTION_TITLE);
        assert_eq!(config.removal_patterns.len(), DEFAULT_REMOVAL_PATTERNS.len());
    }

    #[test]
    fn test_normalization_overrides() {
        let config = NormalizationConfig::from_lookup(lookup_from(&[
            (keys::FEATURE_SECTION_TITLE, "## Feature"),
            (keys::LOGS_SECTION_TITLE, "## Output"),
            (keys::MAX_CONTENT_LENGTH, "1200"),
        ]));
        assert_eq!(config.feature_section_title, "## Feature");
        assert_eq!(config.reproduction_section_title, DEFAULT_REPRODUCTION_SECTION_TITLE);
        assert_eq!(config.logs_section_title, "## Output");
        assert_eq!(config.max_content_length, 1200);
    }

    #[test]
    fn test_invalid_max_length_keeps_default() {
        for raw in ["abc", "0", "-5", ""] {
            let config =
                NormalizationConfig::from_lookup(lookup_from(&[(keys::MAX_CONTENT_LENGTH, raw)]));
            assert_eq!(config.max_content_length, DEFAULT_MAX_CONTENT_LENGTH, "raw: {raw:?}");
        }
    }

    #[test]
    fn test_label_overrides() {
        let labels = LabelConfig::from_lookup(lookup_from(&[
            (keys::LABEL_SPAM, "invalid"),
            (keys::LABEL_NITRO, "upstream: nitro"),
            (keys::LABEL_DUPLICATE, ""),
        ]));
        assert_eq!(labels.spam, "invalid");
        assert_eq!(labels.nitro, "upstream: nitro");
        assert_eq!(labels.duplicate, "duplicate");
        assert_eq!(labels.pending_triage, "pending triage");
    }

    #[test]
    fn test_removal_patterns_round_trip_as_strings() {
        let config = NormalizationConfig::default()
            .with_removal_patterns(vec![Regex::new(r"foo\d+").unwrap()]);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["removal_patterns"], serde_json::json!([r"foo\d+"]));
    }

    #[test]
    fn test_invalid_removal_pattern_fails_to_deserialize() {
        let result: Result<NormalizationConfig, _> =
            serde_json::from_str(r#"{"removal_patterns": ["("]}"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("invalid removal pattern"));
    }

    #[test]
    fn test_client_defaults() {
        let client = ClientConfig::default();
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(client.max_retries, 3);
        assert_eq!(client.retry_delay_ms, 1000);
        assert!(client.token.is_blank());
    }
}
