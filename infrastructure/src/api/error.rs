//! Human-readable messages from non-success responses

use reqwest::StatusCode;
use serde_json::Value;

/// Extract a message from an error body, falling back to the status line.
///
/// Recognized shapes, first match wins:
/// - `{"detail": "..."}`
/// - `{"detail": [{"msg": "..."}, ...]}` (validation errors, joined with `; `)
/// - `{"message": "..."}`
/// - `{"error": {"message": "..."}}` or `{"error": "..."}`
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| message_from_value(&value))
        .unwrap_or_else(|| status_fallback(status))
}

fn message_from_value(value: &Value) -> Option<String> {
    if let Some(detail) = value.get("detail") {
        match detail {
            Value::String(s) => return non_empty(s),
            Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .filter(|msg| !msg.trim().is_empty())
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
    }

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return non_empty(message);
    }

    match value.get("error") {
        Some(Value::String(s)) => non_empty(s),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .and_then(non_empty),
        None => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn status_fallback(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}
