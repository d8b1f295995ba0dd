//! Config redaction: safe-to-log snapshots with secrets masked.

use serde_json::Value;

use crate::schema::AblageConfig;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &["token", "apiKey", "api_key", "secret", "password"];

/// Serialize the config to JSON with every secret replaced by a short hint.
pub fn redacted(config: &AblageConfig) -> Value {
    match serde_json::to_value(config) {
        Ok(value) => redact_recursive(value, ""),
        Err(_) => Value::Null,
    }
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            // First 4 chars keep tokens recognizable (xoxb, sk-p).
            let hint: String = s.chars().take(4).collect();
            if s.chars().count() > 4 {
                Value::String(format!("{hint}***"))
            } else {
                Value::String("***".into())
            }
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let v = redact_recursive(v, &k);
                    (k, v)
                })
                .collect(),
        ),
        other => other,
    }
}
