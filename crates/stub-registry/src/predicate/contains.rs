//! Structural subset checks for JSON values.

use super::deep_equals::deep_equals;
use serde_json::Value;

/// Check that `expected` is contained in `actual`.
///
/// - Objects: every expected key is present and its value is contained.
/// - Arrays: positionally by default (the actual array may be longer); with
///   `ignore_array_order`, each expected element is contained in some actual
///   element.
/// - Scalars: structural equality.
pub fn contains(expected: &Value, actual: &Value, ignore_array_order: bool) -> bool {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => expected.iter().all(|(key, value)| {
            actual
                .get(key)
                .is_some_and(|other| contains(value, other, ignore_array_order))
        }),
        (Value::Array(expected), Value::Array(actual)) => {
            if ignore_array_order {
                expected
                    .iter()
                    .all(|e| actual.iter().any(|a| contains(e, a, true)))
            } else {
                expected.len() <= actual.len()
                    && expected
                        .iter()
                        .zip(actual)
                        .all(|(e, a)| contains(e, a, false))
            }
        }
        _ => deep_equals(expected, actual, ignore_array_order),
    }
}
