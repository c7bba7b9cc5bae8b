//! Continuous closeness between an expected and an actual JSON value.

use super::deep_equals::deep_equals;
use serde_json::Value;
use similar::TextDiff;

/// Score in `[0, 1]`: 1.0 for structurally equal values, the character-level
/// similarity ratio for two differing strings, 0.0 otherwise.
pub fn similarity(expected: &Value, actual: &Value) -> f64 {
    if deep_equals(expected, actual, false) {
        return 1.0;
    }
    match (expected, actual) {
        (Value::String(expected), Value::String(actual)) => {
            f64::from(TextDiff::from_chars(expected.as_str(), actual.as_str()).ratio())
        }
        _ => 0.0,
    }
}
