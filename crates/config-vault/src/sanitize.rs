//! Masking and redaction of sensitive values
//!
//! Field names are matched case-insensitively by substring, so
//! `MS_CLIENT_SECRET` and `github_token` are both treated as sensitive.

use serde_json::{Map, Value};

use crate::config::Configuration;

/// Substrings that mark a field name as sensitive
pub const SENSITIVE_PATTERNS: &[&str] = &[
    "api_key",
    "secret",
    "token",
    "password",
    "client_secret",
    "refresh_token",
    "access_token",
];

/// Mask inserted into displayed secrets
pub const MASK: &str = "****";

/// Placeholder for redacted log metadata
pub const REDACTED: &str = "[REDACTED]";

/// Check whether a field name denotes sensitive data
pub fn is_sensitive_field(field: &str) -> bool {
    let field = field.to_lowercase();
    SENSITIVE_PATTERNS.iter().any(|pattern| field.contains(pattern))
}

/// Mask a secret for display
///
/// Values of 8 or more characters keep their first and last 4 characters;
/// anything shorter, including the empty string, collapses to [`MASK`].
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 8 {
        return MASK.to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, MASK, tail)
}

/// Copy a configuration with every sensitive field masked
pub fn sanitize_config(config: &Configuration) -> Configuration {
    config
        .iter()
        .map(|(field, value)| {
            let shown = if is_sensitive_field(field) {
                mask_value(value)
            } else {
                value.to_string()
            };
            (field.to_string(), shown)
        })
        .collect()
}

/// Redact sensitive-named entries from a metadata tree
///
/// Objects are walked recursively; any key that looks sensitive has its whole
/// value replaced by [`REDACTED`]. Array elements are walked but never
/// redacted by position.
pub fn redact_metadata(metadata: &Value) -> Value {
    match metadata {
        Value::Object(map) => {
            let redacted: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_field(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_metadata(value)
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_metadata).collect()),
        scalar => scalar.clone(),
    }
}
