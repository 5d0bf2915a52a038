//! Redaction of remote error bodies before they are embedded in messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 1_024;
const REDACTED: &str = "[REDACTED]";

static BEARER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer token regex")
});

static KEY_VALUE_SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(api[_-]?key|access[_-]?token|refresh[_-]?token|client[_-]?secret|token|secret|password|authorization)\b\s*[:=]\s*["']?[^"',\s}]+"#,
    )
    .expect("valid key/value secret regex")
});

/// Redact secrets in a remote error body and cap its length.
pub fn sanitize_error_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    if let Ok(mut json) = serde_json::from_str::<Value>(trimmed) {
        redact_json_value(&mut json);
        let serialized =
            serde_json::to_string(&json).unwrap_or_else(|_| "<unserializable error>".to_string());
        return truncate_with_suffix(serialized);
    }

    truncate_with_suffix(redact_inline_secrets(trimmed))
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        Value::String(s) => *s = redact_inline_secrets(s),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace(['-', ' '], "_");
    ["api_key", "token", "secret", "password", "authorization", "cookie"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn redact_inline_secrets(input: &str) -> String {
    let redacted_bearer = BEARER_TOKEN_RE.replace_all(input, "Bearer [REDACTED]");
    KEY_VALUE_SECRET_RE
        .replace_all(&redacted_bearer, "$1=[REDACTED]")
        .into_owned()
}

fn truncate_with_suffix(text: String) -> String {
    if text.chars().count() <= MAX_ERROR_TEXT_CHARS {
        return text;
    }
    let truncated: String = text.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!("{}... [truncated]", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_json_secrets() {
        let body = r#"{"error":"invalid_grant","refresh_token":"abc.def.ghi"}"#;
        let clean = sanitize_error_text(body);
        assert!(clean.contains("invalid_grant"));
        assert!(!clean.contains("abc.def.ghi"));
        assert!(clean.contains(REDACTED));
    }

    #[test]
    fn test_redacts_bearer_in_text() {
        let clean = sanitize_error_text("rejected header Authorization: Bearer sk-1234567890abcdef");
        assert!(!clean.contains("sk-1234567890abcdef"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(sanitize_error_text("   "), "<empty error response body>");
    }

    #[test]
    fn test_truncates_long_bodies() {
        let clean = sanitize_error_text(&"x".repeat(5_000));
        assert!(clean.ends_with("... [truncated]"));
        assert!(clean.len() < 1_100);
    }
}
