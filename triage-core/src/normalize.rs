//! Content normalization for model input
//!
//! Turns raw issue and comment bodies into a bounded excerpt: template
//! comments and diacritics are stripped, noise links removed, and the
//! relevant section of the issue form is kept.

use crate::config::NormalizationConfig;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Language code returned when a code is missing or unusable
pub const FALLBACK_LANGUAGE: &str = "en";

/// Author associations whose input is trusted
const TRUSTED_ASSOCIATIONS: &[&str] = &["OWNER", "MEMBER", "COLLABORATOR"];

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// Normalize issue text into a bounded excerpt.
///
/// The result never exceeds `config.max_content_length` characters. Never
/// fails; empty input yields an empty string.
pub fn normalize(text: &str, config: &NormalizationConfig) -> String {
    let without_comments = HTML_COMMENT.replace_all(text, " ");
    let folded = strip_diacritics(&without_comments);

    let mut cleaned = folded.trim().to_string();
    for pattern in &config.removal_patterns {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    let max = config.max_content_length;

    if let Some(start) = find_marker(&cleaned, &config.feature_section_title) {
        return excerpt(&cleaned[start..], max);
    }

    if let Some(start) = find_marker(&cleaned, &config.reproduction_section_title) {
        let section = &cleaned[start..];
        let logs = config.logs_section_title.as_str();
        let after_marker = config.reproduction_section_title.len();

        let section = match find_marker(&section[after_marker..], logs) {
            Some(offset) => &section[..after_marker + offset],
            None => section,
        };
        return excerpt(section, max);
    }

    excerpt(&cleaned, max)
}

/// Canonically decompose and drop combining diacritical marks
/// (U+0300..=U+036F)
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .collect()
}

/// Reduce a locale tag to a two-letter language code.
///
/// `"EN-us"` becomes `"en"`; anything that is not exactly two letters
/// before the first hyphen falls back to `"en"`.
pub fn normalize_language_code(code: Option<&str>) -> String {
    let Some(code) = code else {
        return FALLBACK_LANGUAGE.to_string();
    };

    let lowered = code.to_lowercase();
    let base = lowered.split('-').next().unwrap_or_default();

    if base.len() == 2 && base.chars().all(|c| c.is_ascii_lowercase()) {
        base.to_string()
    } else {
        FALLBACK_LANGUAGE.to_string()
    }
}

/// Whether an author association (`OWNER`, `MEMBER`, ...) is trusted
pub fn is_collaborator_or_higher(association: &str) -> bool {
    TRUSTED_ASSOCIATIONS.contains(&association)
}

fn find_marker(text: &str, marker: &str) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }
    text.find(marker)
}

/// First `max` characters of `text`, trimmed
fn excerpt(text: &str, max: usize) -> String {
    let end = text
        .char_indices()
        .nth(max)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    text[..end].trim().to_string()
}
