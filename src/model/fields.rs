//! JSON field extraction shared by the `from_json` constructors.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use super::ValidationError;

pub(crate) type Object = Map<String, Value>;

pub(crate) fn object(value: Value) -> Result<Object, ValidationError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::new(
            "body",
            format!("expected a JSON object, got {}", kind(&other)),
        )),
    }
}

/// Look up a field, treating an explicit `null` as absent.
fn present<'a>(obj: &'a Object, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

pub(crate) fn required_str(obj: &Object, field: &str) -> Result<String, ValidationError> {
    optional_str(obj, field)?.ok_or_else(|| ValidationError::new(field, "is required"))
}

pub(crate) fn optional_str(obj: &Object, field: &str) -> Result<Option<String>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mistyped(field, "a string", other)),
    }
}

pub(crate) fn required_number(obj: &Object, field: &str) -> Result<f64, ValidationError> {
    match present(obj, field) {
        None => Err(ValidationError::new(field, "is required")),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| ValidationError::new(field, "must be a finite number")),
        Some(other) => Err(mistyped(field, "a number", other)),
    }
}

pub(crate) fn optional_object(obj: &Object, field: &str) -> Result<Option<Object>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(mistyped(field, "an object", other)),
    }
}

pub(crate) fn optional_str_list(
    obj: &Object,
    field: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(mistyped(field, "an array of strings", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(mistyped(field, "an array of strings", other)),
    }
}

/// RFC 3339 string or integer milliseconds since the Unix epoch.
pub(crate) fn optional_timestamp(
    obj: &Object,
    field: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::new(field, format!("invalid date {s:?}: {e}"))),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(Some)
            .ok_or_else(|| ValidationError::new(field, format!("invalid epoch milliseconds {n}"))),
        Some(other) => Err(mistyped(field, "a date", other)),
    }
}

fn mistyped(field: &str, expected: &str, got: &Value) -> ValidationError {
    ValidationError::new(field, format!("expected {expected}, got {}", kind(got)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
