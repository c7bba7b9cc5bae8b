//! Structural comparison of JSON payloads against stub criteria.
//!
//! # Module Structure
//!
//! - `deep_equals` - exact structural equality, optionally ignoring array order
//! - `contains` - structural subset checks
//! - `matches` - regular expressions over string leaves, with a compiled-pattern cache
//! - `similarity` - continuous closeness score used for fallback ranking

mod contains;
mod deep_equals;
mod matches;
mod similarity;

pub use contains::contains;
pub use deep_equals::deep_equals;
pub use matches::RegexCache;
pub use similarity::similarity;

use serde_json::Value;
use std::borrow::Cow;

/// Render a JSON value the way string predicates see it: strings verbatim,
/// everything else as compact JSON.
pub(crate) fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
