//! Exact structural equality for JSON values.
//!
//! Unlike `contains`, `deep_equals` requires an EXACT match: objects must have
//! the same key set and arrays the same length.

use serde_json::{Number, Value};

/// Compare `expected` and `actual` structurally.
///
/// With `ignore_array_order` set, arrays at any depth compare as multisets.
/// Numbers compare by value, so `1` equals `1.0`.
pub fn deep_equals(expected: &Value, actual: &Value, ignore_array_order: bool) -> bool {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            expected.len() == actual.len()
                && expected.iter().all(|(key, value)| {
                    actual
                        .get(key)
                        .is_some_and(|other| deep_equals(value, other, ignore_array_order))
                })
        }
        (Value::Array(expected), Value::Array(actual)) => {
            if expected.len() != actual.len() {
                return false;
            }
            if ignore_array_order {
                unordered_equals(expected, actual)
            } else {
                expected
                    .iter()
                    .zip(actual)
                    .all(|(e, a)| deep_equals(e, a, false))
            }
        }
        (Value::Number(expected), Value::Number(actual)) => numbers_equal(expected, actual),
        _ => expected == actual,
    }
}

/// Integers compare exactly; `f64` is only used when either side is a float.
fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    if let (Some(e), Some(a)) = (expected.as_i64(), actual.as_i64()) {
        return e == a;
    }
    if let (Some(e), Some(a)) = (expected.as_u64(), actual.as_u64()) {
        return e == a;
    }
    if expected.is_f64() || actual.is_f64() {
        return match (expected.as_f64(), actual.as_f64()) {
            (Some(e), Some(a)) => e == a,
            _ => false,
        };
    }
    // one negative i64 and one u64 above i64::MAX
    false
}

/// Multiset equality: each expected element claims a distinct equal actual element.
fn unordered_equals(expected: &[Value], actual: &[Value]) -> bool {
    let mut claimed = vec![false; actual.len()];
    expected.iter().all(|e| {
        let slot = actual
            .iter()
            .enumerate()
            .position(|(i, a)| !claimed[i] && deep_equals(e, a, true));
        match slot {
            Some(i) => {
                claimed[i] = true;
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objects_require_same_keys() {
        let expected = json!({"name": "Bob", "age": 30});
        assert!(deep_equals(&expected, &json!({"age": 30, "name": "Bob"}), false));
        assert!(!deep_equals(&expected, &json!({"name": "Bob"}), false));
        assert!(!deep_equals(
            &expected,
            &json!({"name": "Bob", "age": 30, "extra": true}),
            false
        ));
    }

    #[test]
    fn test_array_order() {
        let expected = json!({"tags": ["a", "b", "b"]});
        let shuffled = json!({"tags": ["b", "a", "b"]});
        assert!(!deep_equals(&expected, &shuffled, false));
        assert!(deep_equals(&expected, &shuffled, true));

        // multiset, not set
        assert!(!deep_equals(&json!(["a", "b", "b"]), &json!(["a", "a", "b"]), true));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(deep_equals(&json!(1), &json!(1.0), false));
        assert!(!deep_equals(&json!(1), &json!("1"), false));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        // 2^53 + 1 and 2^53 collapse to the same f64
        assert!(!deep_equals(
            &json!(9007199254740993u64),
            &json!(9007199254740992u64),
            false
        ));
        assert!(deep_equals(
            &json!(9007199254740993u64),
            &json!(9007199254740993u64),
            false
        ));
        assert!(!deep_equals(&json!(-9007199254740993i64), &json!(-9007199254740992i64), false));
        assert!(!deep_equals(&json!(u64::MAX), &json!(-1), false));
        assert!(deep_equals(&json!(9007199254740992u64), &json!(9007199254740992.0), false));
    }

    #[test]
    fn test_nested_structures() {
        let expected = json!({"user": {"roles": [{"id": 2}, {"id": 1}]}});
        let actual = json!({"user": {"roles": [{"id": 1}, {"id": 2}]}});
        assert!(deep_equals(&expected, &actual, true));
        assert!(!deep_equals(&expected, &actual, false));
    }
}
