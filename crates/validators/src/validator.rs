//! Validator attached to a schema attribute

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base64::validate_base64;
use crate::datetime::validate_datetime;
use crate::error::{describe_range, ValidationError};
use crate::labels::{validate_annotations, validate_labels};
use crate::name::{validate_dns1123_label, validate_dns1123_subdomain};

/// A check run against a configured attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "values")]
pub enum Validator {
    /// String must be standard base64
    Base64,
    /// String must be an RFC 3339 timestamp
    DateTime,
    /// String must be a DNS-1123 subdomain
    Name,
    /// String must be a DNS-1123 label
    Namespace,
    /// Map of string must be valid labels
    Labels,
    /// Map of string must be valid annotations
    Annotations,
    /// String must be one of the listed values
    OneOf(Vec<String>),
    /// Integer must lie within the inclusive bounds
    IntRange {
        min: Option<i64>,
        max: Option<i64>,
    },
}

impl Validator {
    /// Human readable description, shown in schema output
    pub fn description(&self) -> String {
        match self {
            Validator::Base64 => "value must be base64 encoded".to_string(),
            Validator::DateTime => "value must be an RFC 3339 date-time".to_string(),
            Validator::Name => "value must be a valid Kubernetes object name".to_string(),
            Validator::Namespace => "value must be a valid Kubernetes namespace name".to_string(),
            Validator::Labels => "keys and values must be valid Kubernetes labels".to_string(),
            Validator::Annotations => "keys must be valid Kubernetes annotation keys".to_string(),
            Validator::OneOf(allowed) => format!("value must be one of: {}", allowed.join(", ")),
            Validator::IntRange { min, max } => format!("value {}", describe_range(*min, *max)),
        }
    }

    /// Run the check. Values of a type this validator does not apply to pass.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match (self, value) {
            (Validator::Base64, Value::String(s)) => validate_base64(s),
            (Validator::DateTime, Value::String(s)) => validate_datetime(s),
            (Validator::Name, Value::String(s)) => validate_dns1123_subdomain(s),
            (Validator::Namespace, Value::String(s)) => validate_dns1123_label(s),
            (Validator::Labels, Value::Object(map)) => validate_labels(string_entries(map)),
            (Validator::Annotations, Value::Object(map)) => validate_annotations(string_entries(map)),
            (Validator::OneOf(allowed), Value::String(s)) => {
                if allowed.iter().any(|a| a == s) {
                    Ok(())
                } else {
                    Err(ValidationError::NotOneOf {
                        value: s.clone(),
                        allowed: allowed.clone(),
                    })
                }
            }
            (Validator::IntRange { min, max }, Value::Number(n)) => {
                let Some(value) = n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)) else {
                    return Ok(());
                };
                let below = min.is_some_and(|min| value < i128::from(min));
                let above = max.is_some_and(|max| value > i128::from(max));
                if below || above {
                    Err(ValidationError::OutOfRange {
                        value,
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Range check for an OpenAPI integer `format`, if it implies one
    pub fn for_integer_format(format: &str) -> Option<Self> {
        let (min, max) = match format {
            "int32" => (Some(i64::from(i32::MIN)), Some(i64::from(i32::MAX))),
            "uint32" => (Some(0), Some(i64::from(u32::MAX))),
            "uint64" | "uint" => (Some(0), None),
            "int8" => (Some(i64::from(i8::MIN)), Some(i64::from(i8::MAX))),
            "uint8" => (Some(0), Some(i64::from(u8::MAX))),
            "int16" => (Some(i64::from(i16::MIN)), Some(i64::from(i16::MAX))),
            "uint16" => (Some(0), Some(i64::from(u16::MAX))),
            _ => return None,
        };
        Some(Validator::IntRange { min, max })
    }
}

fn string_entries(map: &serde_json::Map<String, Value>) -> impl Iterator<Item = (&str, &str)> {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
}
