//! Dynamic-type wrappers
//!
//! Wrapper types for CRD fields whose OpenAPI schema cannot be expressed by a
//! plain Rust type. Each carries a hand-written JSON schema so the derived CRD
//! keeps the upstream shape (`x-kubernetes-preserve-unknown-fields`,
//! `x-kubernetes-int-or-string`, `format: byte`, `format: date-time`).

use std::borrow::Cow;

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form subtree passed through to the manifest untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicValue(pub Value);

impl DynamicValue {
    /// Borrow the wrapped JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for DynamicValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl JsonSchema for DynamicValue {
    fn schema_name() -> Cow<'static, str> {
        "DynamicValue".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "x-kubernetes-preserve-unknown-fields": true
        })
    }
}

/// Integer or string, as used by ports and durations in upstream CRDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    /// Integer form
    Int(i64),
    /// String form
    String(String),
}

impl JsonSchema for IntOrString {
    fn schema_name() -> Cow<'static, str> {
        "IntOrString".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "x-kubernetes-int-or-string": true,
            "anyOf": [
                { "type": "integer" },
                { "type": "string" }
            ]
        })
    }
}

/// Base64-encoded bytes (`format: byte`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base64String(pub String);

impl JsonSchema for Base64String {
    fn schema_name() -> Cow<'static, str> {
        "Base64String".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "format": "byte"
        })
    }
}

/// RFC 3339 timestamp kept in its textual form (`format: date-time`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateTimeString(pub String);

impl JsonSchema for DateTimeString {
    fn schema_name() -> Cow<'static, str> {
        "DateTimeString".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "format": "date-time"
        })
    }
}

/// Recursively remove `null` members from objects.
///
/// Array elements are kept in place; only object members are dropped.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}
