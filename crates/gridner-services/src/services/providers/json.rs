//! Helpers for walking provider JSON payloads.

use serde_json::{Map, Value};

use super::ProviderError;

pub(super) type Object = Map<String, Value>;

/// Parse a body that must be a JSON object.
pub(super) fn parse_object(body: &str) -> Result<Object, ProviderError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ProviderError::MalformedResponse(
            "expected a JSON object".to_string(),
        )),
        Err(e) => Err(ProviderError::MalformedResponse(format!(
            "invalid JSON ({}): {}",
            e,
            snippet(body)
        ))),
    }
}

pub(super) fn field<'a>(object: &'a Object, key: &str) -> Result<&'a Value, ProviderError> {
    object
        .get(key)
        .ok_or_else(|| ProviderError::MalformedResponse(format!("missing field '{}'", key)))
}

pub(super) fn array_field<'a>(object: &'a Object, key: &str) -> Result<&'a Vec<Value>, ProviderError> {
    field(object, key)?
        .as_array()
        .ok_or_else(|| ProviderError::MalformedResponse(format!("field '{}' is not an array", key)))
}

pub(super) fn object_field<'a>(object: &'a Object, key: &str) -> Result<&'a Object, ProviderError> {
    as_object(field(object, key)?, key)
}

pub(super) fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, ProviderError> {
    value
        .as_object()
        .ok_or_else(|| ProviderError::MalformedResponse(format!("'{}' is not an object", what)))
}

/// Text of a field that must be present.
pub(super) fn text_field(object: &Object, key: &str) -> Result<String, ProviderError> {
    Ok(text_of(field(object, key)?))
}

/// Scalar value rendered as text. `null` reads as "null"; containers read as "".
pub(super) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Numeric value of a field, accepting numbers and numeric strings.
pub(super) fn number_field(object: &Object, key: &str) -> Result<f64, ProviderError> {
    let value = field(object, key)?;
    match (value.as_f64(), value.as_str()) {
        (Some(number), _) => Ok(number),
        (None, Some(text)) => parse_score(text),
        _ => Err(ProviderError::MalformedResponse(format!(
            "field '{}' is not a number",
            key
        ))),
    }
}

/// Parse a confidence score. Scores must be finite so they survive a JSON
/// round trip; "NaN" and "inf" are rejected.
pub(super) fn parse_score(text: &str) -> Result<f64, ProviderError> {
    match text.trim().parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(ProviderError::MalformedResponse(format!(
            "invalid confidence '{}'",
            text
        ))),
    }
}

/// Beginning of a body, for error messages.
pub(super) fn snippet(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_of_scalars() {
        assert_eq!(text_of(&json!("x")), "x");
        assert_eq!(text_of(&json!(0.5)), "0.5");
        assert_eq!(text_of(&json!(null)), "null");
        assert_eq!(text_of(&json!([1])), "");
    }

    #[test]
    fn test_parse_object_rejects_other_json() {
        assert!(parse_object("{}").is_ok());
        assert!(matches!(parse_object("[]"), Err(ProviderError::MalformedResponse(_))));
        assert!(matches!(parse_object("<html>"), Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn test_number_field_accepts_strings() {
        let object = parse_object(r#"{"a": 0.25, "b": "0.75", "c": "high"}"#).unwrap();
        assert_eq!(number_field(&object, "a").unwrap(), 0.25);
        assert_eq!(number_field(&object, "b").unwrap(), 0.75);
        assert!(number_field(&object, "c").is_err());
        assert!(number_field(&object, "d").is_err());
    }

    #[test]
    fn test_non_finite_scores_are_malformed() {
        let object = parse_object(r#"{"a": "NaN", "b": "inf", "c": " -Infinity "}"#).unwrap();
        for key in ["a", "b", "c"] {
            assert!(matches!(
                number_field(&object, key),
                Err(ProviderError::MalformedResponse(_))
            ));
        }
        assert_eq!(parse_score(" 0.5 ").unwrap(), 0.5);
    }
}
