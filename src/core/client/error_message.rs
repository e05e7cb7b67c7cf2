//! Turns an error response body into a human-readable message.

use serde_json::Value;

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Prefers `error_description`, then `error` (following nested `error`
/// objects), then the raw body, then [`UNKNOWN_ERROR_MESSAGE`].
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = message_from_value(&value) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    let obj = value.as_object()?;

    if let Some(Value::String(desc)) = obj.get("error_description") {
        if !desc.is_empty() {
            return Some(desc.clone());
        }
    }

    match obj.get("error")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        nested @ Value::Object(_) => message_from_value(nested),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_is_unwrapped() {
        assert_eq!(extract_error_message(r#"{"error":{"error":"forbidden"}}"#), "forbidden");
        assert_eq!(
            extract_error_message(r#"{"error":{"error":{"error":"deep"}}}"#),
            "deep"
        );
    }

    #[test]
    fn test_error_description_wins() {
        let body = r#"{"error":"invalid_request","error_description":"tenant not found"}"#;
        assert_eq!(extract_error_message(body), "tenant not found");
    }

    #[test]
    fn test_nested_error_description() {
        let body = r#"{"error":{"error":"x","error_description":"inner description"}}"#;
        assert_eq!(extract_error_message(body), "inner description");
    }

    #[test]
    fn test_plain_error_string() {
        assert_eq!(extract_error_message(r#"{"error":"bad period"}"#), "bad period");
    }

    #[test]
    fn test_falls_back_to_raw_text() {
        assert_eq!(extract_error_message("upstream timed out\n"), "upstream timed out");
        assert_eq!(extract_error_message(r#"{"message":"nope"}"#), r#"{"message":"nope"}"#);
    }

    #[test]
    fn test_empty_body_uses_placeholder() {
        assert_eq!(extract_error_message(""), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(extract_error_message("   "), UNKNOWN_ERROR_MESSAGE);
    }
}
