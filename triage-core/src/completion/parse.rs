//! Lenient decoding of model output into JSON

use serde::de::DeserializeOwned;
use tracing::warn;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Remove a surrounding Markdown code fence, if present.
///
/// Accepts an opening fence with or without a `json` language tag (any
/// case) and an optional closing fence. The result is trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = match rest.get(..JSON_TAG.len()) {
            Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &rest[JSON_TAG.len()..],
            _ => rest,
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// Decode `response` as JSON, falling back to `fallback` on any failure.
///
/// Never fails: the raw response and the decode error are logged and the
/// fallback is returned instead.
pub fn parse_json<T: DeserializeOwned>(response: &str, fallback: T) -> T {
    let cleaned = strip_code_fence(response);

    match serde_json::from_str::<T>(cleaned) {
        Ok(value) => value,
        Err(err) => {
            warn!(raw_response = %response, error = %err, "Failed to parse model response as JSON");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_strip_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence(""), "");
        assert_eq!(strip_code_fence("```"), "");
    }

    #[test]
    fn test_strip_handles_unterminated_fence() {
        assert_eq!(strip_code_fence("```json {\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_short_tag_is_safe() {
        // Fewer bytes than the tag, and a multi-byte char straddling it.
        assert_eq!(strip_code_fence("```js"), "js");
        assert_eq!(strip_code_fence("```abcé"), "abcé");
    }

    #[test]
    fn test_parse_fenced_object() {
        let value: Value = parse_json("```json\n{\"a\":1}\n```", json!({}));
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_returns_fallback_on_garbage() {
        let value: Value = parse_json("not json", json!({"fallback": true}));
        assert_eq!(value, json!({"fallback": true}));
    }

    #[test]
    fn test_parse_returns_fallback_on_shape_mismatch() {
        #[derive(Debug, Default, PartialEq, Deserialize)]
        struct Verdict {
            spam: bool,
        }

        let verdict = parse_json("{\"spam\": \"maybe\"}", Verdict::default());
        assert_eq!(verdict, Verdict::default());

        let verdict = parse_json("```\n{\"spam\": true}\n```", Verdict::default());
        assert_eq!(verdict, Verdict { spam: true });
    }

    #[test]
    fn test_parse_empty_input() {
        let value: Value = parse_json("", json!(null));
        assert_eq!(value, Value::Null);
    }
}
