//! Stub definition stored by the mock server.
//!
//! A stub is filed under a (service, method) pair and carries two groups of
//! matching criteria (`headers` and `input`) plus the `output` returned to the
//! caller when it wins resolution. The shape is serde-friendly so an external
//! loader can read stubs straight from JSON or YAML files.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Field name to expected value.
pub type Fields = Map<String, Value>;

/// Stub definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stub {
    /// Assigned once at creation; a definition without an id gets a fresh one
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub service: String,
    pub method: String,
    /// Criteria checked against request metadata (header names are case-insensitive)
    #[serde(default, skip_serializing_if = "InputCriteria::is_empty")]
    pub headers: InputCriteria,
    /// Criteria checked against the request payload
    #[serde(default, skip_serializing_if = "InputCriteria::is_empty")]
    pub input: InputCriteria,
    #[serde(default)]
    pub output: StubOutput,
}

/// One group of comparison criteria.
///
/// Every populated operator must hold for the group to match. An empty group
/// places no requirement on the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Fields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Fields>,
    /// String values are regular expressions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Fields>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore_array_order: bool,
}

impl InputCriteria {
    /// No operator present at all. An operator with no fields still counts,
    /// since an empty exact `equals` only accepts an empty payload.
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.contains.is_none()
            && self.matches.is_none()
            && !self.ignore_array_order
    }

    /// Total number of declared fields across all operators.
    pub fn field_count(&self) -> usize {
        [&self.equals, &self.contains, &self.matches]
            .into_iter()
            .flatten()
            .map(Map::len)
            .sum()
    }
}

/// Response data returned to the caller when the stub wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubOutput {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Status code reported alongside `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

impl Stub {
    /// Create a catch-all stub with a fresh identifier.
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service: service.into(),
            method: method.into(),
            headers: InputCriteria::default(),
            input: InputCriteria::default(),
            output: StubOutput::default(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_input_equals(mut self, fields: Value) -> Self {
        self.input.equals = Some(into_fields(fields));
        self
    }

    pub fn with_input_contains(mut self, fields: Value) -> Self {
        self.input.contains = Some(into_fields(fields));
        self
    }

    pub fn with_input_matches(mut self, fields: Value) -> Self {
        self.input.matches = Some(into_fields(fields));
        self
    }

    pub fn with_header_equals(mut self, fields: Value) -> Self {
        self.headers.equals = Some(into_fields(fields));
        self
    }

    pub fn with_output(mut self, data: Value) -> Self {
        self.output.data = Some(data);
        self
    }

    /// Whether the stub places no constraint on the query and so matches any query.
    pub fn is_catch_all(&self) -> bool {
        self.headers.field_count() == 0
            && self.input.field_count() == 0
            && self.input.equals.is_none()
    }
}

impl Record for Stub {
    fn id(&self) -> Uuid {
        self.id
    }

    fn service(&self) -> &str {
        &self.service
    }

    fn method(&self) -> &str {
        &self.method
    }
}

/// Non-object values carry no fields.
fn into_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}
