//! Request descriptor handed to the resolver by the transport layer.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Header that marks a request as internal (excluded from usage tracking).
pub const DEFAULT_INTERNAL_HEADER: &str = "x-stub-request-internal";

/// One inbound call, read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub service: String,
    pub method: String,
    /// Explicit stub to resolve, bypassing ranking
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Synthetic request that must not count towards usage tracking
    #[serde(default)]
    pub internal: bool,
}

impl Query {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the payload. Non-object values are treated as an empty payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Set request headers, flagging the query internal when
    /// [`DEFAULT_INTERNAL_HEADER`] is present.
    pub fn with_headers(self, headers: HashMap<String, String>) -> Self {
        self.with_headers_flagged_by(headers, DEFAULT_INTERNAL_HEADER)
    }

    /// Set request headers, flagging the query internal when `internal_header`
    /// is present (case-insensitive). The flag header itself is not kept.
    pub fn with_headers_flagged_by(
        mut self,
        headers: HashMap<String, String>,
        internal_header: &str,
    ) -> Self {
        let mut kept = HashMap::with_capacity(headers.len());
        for (name, value) in headers {
            if name.eq_ignore_ascii_case(internal_header) {
                self.internal = true;
            } else {
                kept.insert(name, value);
            }
        }
        self.headers = kept;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_internal_header_sets_flag_and_is_stripped() {
        let headers: HashMap<String, String> = [
            ("X-Stub-Request-Internal".to_string(), "true".to_string()),
            ("x-user".to_string(), "alice".to_string()),
        ]
        .into_iter()
        .collect();

        let query = Query::new("Greeter", "SayHello").with_headers(headers);
        assert!(query.internal);
        assert_eq!(query.headers.len(), 1);
        assert_eq!(query.header("X-USER"), Some("alice"));
        assert_eq!(query.header(DEFAULT_INTERNAL_HEADER), None);
    }

    #[test]
    fn test_custom_internal_header() {
        let headers: HashMap<String, String> = [("x-probe".to_string(), "1".to_string())]
            .into_iter()
            .collect();
        let query = Query::new("Greeter", "SayHello").with_headers_flagged_by(headers, "X-Probe");
        assert!(query.internal);
        assert!(query.headers.is_empty());
    }

    #[test]
    fn test_plain_headers_leave_query_external() {
        let headers: HashMap<String, String> = [("x-user".to_string(), "bob".to_string())]
            .into_iter()
            .collect();
        let query = Query::new("Greeter", "SayHello").with_headers(headers);
        assert!(!query.internal);
    }

    #[test]
    fn test_query_deserialize() {
        let json = r#"{
            "service": "Greeter",
            "method": "SayHello",
            "id": "6f1e9d5c-93a4-4c43-9f7e-2b0c1f1e5a10",
            "data": {"name": "Bob"}
        }"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.service, "Greeter");
        assert!(query.id.is_some());
        assert_eq!(query.data.get("name"), Some(&json!("Bob")));
        assert!(!query.internal);
    }

    #[test]
    fn test_non_object_data_is_empty() {
        let query = Query::new("Greeter", "SayHello").with_data(json!([1, 2, 3]));
        assert!(query.data.is_empty());
    }
}
