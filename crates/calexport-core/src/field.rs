//! Defensive field access over loosely structured JSON records.
//!
//! Calendar services return records whose schema we do not own. Every
//! accessor here is a pure function of `(value, key, default)`: a missing key,
//! a `null`, or a value of the wrong type all resolve to the default. None of
//! them can fail.
//!
//! # Example
//!
//! ```
//! use calexport_core::field;
//! use serde_json::json;
//!
//! let event = json!({"subject": "Standup", "start": {"timeZone": "Europe/Paris"}});
//! assert_eq!(field::str_or(&event, "subject", "No Title"), "Standup");
//! assert_eq!(field::str_at(&event, &["start", "timeZone"], "UTC"), "Europe/Paris");
//! assert_eq!(field::str_at(&event, &["end", "dateTime"], ""), "");
//! ```

use serde_json::{Map, Value};

/// Looks up `key` on an object. Non-objects have no fields.
pub fn get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|obj| obj.get(key))
}

/// Follows a chain of object keys.
pub fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| get(current, key))
}

/// Returns the string at `key`, or `None` if absent or not a string.
pub fn str_opt<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    get(value, key).and_then(Value::as_str)
}

/// Returns the string at `key`, or `default`.
pub fn str_or(value: &Value, key: &str, default: &str) -> String {
    str_opt(value, key).unwrap_or(default).to_string()
}

/// Returns the string found by following `path`, or `default`.
pub fn str_at(value: &Value, path: &[&str], default: &str) -> String {
    get_path(value, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Returns the scalar at `key` as text.
///
/// Strings come back as-is, numbers and booleans in their JSON spelling.
/// `null`, arrays and objects count as absent.
pub fn text_opt(value: &Value, key: &str) -> Option<String> {
    match get(value, key)? {
        Value::String(s) => Some(s.clone()),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        _ => None,
    }
}

/// Returns the string at `key` only when it is present and non-empty.
pub fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    str_opt(value, key).filter(|s| !s.is_empty())
}

/// Returns the boolean at `key`, or `default`.
pub fn bool_or(value: &Value, key: &str, default: bool) -> bool {
    get(value, key).and_then(Value::as_bool).unwrap_or(default)
}

/// Returns the array at `key`, or an empty slice.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    get(value, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Returns the object at `key`, or `None` if absent or not an object.
pub fn object<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    get(value, key).and_then(Value::as_object)
}

/// Returns a copy of the object at `key`, or an empty object.
pub fn object_or_empty(value: &Value, key: &str) -> Value {
    object(value, key)
        .map(|obj| Value::Object(obj.clone()))
        .unwrap_or_else(|| Value::Object(Map::new()))
}
