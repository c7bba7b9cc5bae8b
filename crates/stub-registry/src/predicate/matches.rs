//! Regular-expression matching over JSON string leaves.

use super::as_text;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Cache of compiled patterns keyed by source text.
///
/// Stubs are deserialized with raw pattern strings, so patterns are compiled
/// on first use and shared afterwards. A pattern that fails to compile is
/// cached as `None` and never matches.
#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: RwLock<HashMap<String, Option<Arc<Regex>>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled form of `pattern`, or `None` if it is not a valid regex.
    pub fn get(&self, pattern: &str) -> Option<Arc<Regex>> {
        if let Some(entry) = self.compiled.read().get(pattern) {
            return entry.clone();
        }

        let mut compiled = self.compiled.write();
        compiled
            .entry(pattern.to_string())
            .or_insert_with(|| match Regex::new(pattern) {
                Ok(regex) => Some(Arc::new(regex)),
                Err(e) => {
                    warn!("Invalid matches pattern '{}': {}", pattern, e);
                    None
                }
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.compiled.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.read().is_empty()
    }

    /// Check `actual` against `expected`, where every string in `expected` is
    /// a pattern applied to the textual form of the corresponding actual value.
    ///
    /// Objects recurse key by key (extra actual keys are allowed), arrays
    /// recurse element by element and must have equal length, and any other
    /// expected scalar compares by equality.
    pub fn matches(&self, expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::String(pattern), actual) => match self.get(pattern) {
                Some(regex) => regex.is_match(&as_text(actual)),
                None => false,
            },
            (Value::Object(expected), Value::Object(actual)) => {
                expected.iter().all(|(key, value)| {
                    actual
                        .get(key)
                        .is_some_and(|other| self.matches(value, other))
                })
            }
            (Value::Array(expected), Value::Array(actual)) => {
                expected.len() == actual.len()
                    && expected
                        .iter()
                        .zip(actual)
                        .all(|(e, a)| self.matches(e, a))
            }
            (expected, actual) => expected == actual,
        }
    }
}
