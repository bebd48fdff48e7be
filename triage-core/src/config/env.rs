//! Environment variable handling for configuration

use super::error::ConfigError;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Recognized override keys
pub mod keys {
    pub const FEATURE_SECTION_TITLE: &str = "TRIAGE_FEATURE_SECTION_TITLE";
    pub const REPRODUCTION_SECTION_TITLE: &str = "TRIAGE_REPRODUCTION_SECTION_TITLE";
    pub const LOGS_SECTION_TITLE: &str = "TRIAGE_LOGS_SECTION_TITLE";
    pub const MAX_CONTENT_LENGTH: &str = "TRIAGE_MAX_CONTENT_LENGTH";

    pub const LABEL_NEEDS_REPRODUCTION: &str = "TRIAGE_LABEL_NEEDS_REPRODUCTION";
    pub const LABEL_POSSIBLE_REGRESSION: &str = "TRIAGE_LABEL_POSSIBLE_REGRESSION";
    pub const LABEL_PENDING_TRIAGE: &str = "TRIAGE_LABEL_PENDING_TRIAGE";
    pub const LABEL_NITRO: &str = "TRIAGE_LABEL_NITRO";
    pub const LABEL_SPAM: &str = "TRIAGE_LABEL_SPAM";
    pub const LABEL_DUPLICATE: &str = "TRIAGE_LABEL_DUPLICATE";
}

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid")
});

/// Read a key from the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Interpolate `${VAR}` references in a configuration string using the
/// process environment
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    interpolate_with(content, process_env)
}

/// Interpolate `${VAR}` references using an arbitrary lookup.
///
/// Fails on the first reference that the lookup cannot resolve.
pub fn interpolate_with<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = None;

    let result = ENV_VAR_PATTERN.replace_all(content, |cap: &Captures<'_>| {
        let var_name = &cap[1];
        match lookup(var_name) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(result.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(key: &str) -> Option<String> {
        match key {
            "VAR1" => Some("value1".to_string()),
            "VAR2" => Some("value2".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_interpolate_vars() {
        let result = interpolate_with("key1: ${VAR1}, key2: ${VAR2}", lookup).unwrap();
        assert_eq!(result, "key1: value1, key2: value2");
    }

    #[test]
    fn test_missing_env_var() {
        let result = interpolate_with("token: ${MISSING_VAR} ${ALSO_MISSING}", lookup);

        if let Err(ConfigError::EnvVarNotFound { var }) = result {
            assert_eq!(var, "MISSING_VAR");
        } else {
            panic!("Expected EnvVarNotFound error");
        }
    }

    #[test]
    fn test_lowercase_references_are_left_alone() {
        let result = interpolate_with("literal ${not_a_var} and $VAR1", lookup).unwrap();
        assert_eq!(result, "literal ${not_a_var} and $VAR1");
    }
}
