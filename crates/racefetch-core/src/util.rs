//! Small serialization helpers shared by request building and tests

use serde::Serialize;
use serde_json::Value;

/// Serialize a value to JSON, returning `None` instead of an error
pub fn safe_json_stringify<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

/// True for JSON objects, the only body shape that is JSON-encoded before sending
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}
