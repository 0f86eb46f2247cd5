//! Utilities for keeping credentials out of logs and error messages

use serde_json::{Map, Value as JsonValue};

/// Field names treated as secrets wherever they appear
const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwd",
    "token",
    "access_token",
    "refresh_token",
    "client_secret",
    "api_key",
    "authorization",
    "secret",
    "private_key",
    "credential",
    "credentials",
];

/// Substrings that mark a field as sensitive (case-insensitive)
const SENSITIVE_PATTERNS: &[&str] = &["_key", "_token", "_secret", "_password"];

/// `auth_config` fields that identify a credential without revealing it
const PUBLIC_AUTH_FIELDS: &[&str] = &["username", "name", "location"];

const SANITIZED_PLACEHOLDER: &str = "***REDACTED***";

/// Check if a field name indicates sensitive data
pub fn is_sensitive_field(field_name: &str) -> bool {
    let field_lower = field_name.to_lowercase();

    if SENSITIVE_FIELDS.iter().any(|&sensitive| field_lower == sensitive) {
        return true;
    }

    SENSITIVE_PATTERNS.iter().any(|&pattern| field_lower.contains(pattern))
}

/// Sanitize a JSON value by replacing sensitive fields with placeholders
pub fn sanitize_json_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let sanitized: Map<String, JsonValue> = map
                .iter()
                .map(|(key, val)| {
                    let val = if is_sensitive_field(key) && !val.is_object() && !val.is_array() {
                        JsonValue::String(SANITIZED_PLACEHOLDER.to_string())
                    } else {
                        sanitize_json_value(val)
                    };
                    (key.clone(), val)
                })
                .collect();
            JsonValue::Object(sanitized)
        }
        JsonValue::Array(arr) => JsonValue::Array(arr.iter().map(sanitize_json_value).collect()),
        other => other.clone(),
    }
}

/// Redact an `auth_config` document: every value except the public
/// identifying fields is replaced.
pub fn redact_auth_config(config: &JsonValue) -> JsonValue {
    match config {
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, val)| {
                    let val = if PUBLIC_AUTH_FIELDS.contains(&key.as_str()) {
                        val.clone()
                    } else {
                        JsonValue::String(SANITIZED_PLACEHOLDER.to_string())
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        JsonValue::Null => JsonValue::Null,
        _ => JsonValue::String(SANITIZED_PLACEHOLDER.to_string()),
    }
}
