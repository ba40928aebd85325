//! OpenAPI v3 to attribute derivation
//!
//! Maps structural CRD schemas onto [`AttributeKind`]s. Anything that cannot
//! be represented precisely becomes [`AttributeKind::Dynamic`] and is passed
//! through to the manifest untouched.

use serde_json::Value;
use tracing::debug;
use utilities::to_snake_case;
use validators::Validator;

use super::attribute::{Attribute, AttributeKind, ElementType, Presence};

/// Names listed in a schema's `required` array
pub(super) fn required_properties(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Build the attribute for one property of an object schema.
pub(super) fn property_attribute(json_name: &str, schema: &Value, required: bool) -> Attribute {
    let description = schema
        .get("description")
        .and_then(Value::as_str)
        .or_else(|| resolve(schema).get("description").and_then(Value::as_str))
        .map(str::to_string);

    let element = element_type(schema);

    Attribute {
        name: to_snake_case(json_name),
        json_name: json_name.to_string(),
        description,
        kind: element.kind,
        presence: if required {
            Presence::Required
        } else {
            Presence::Optional
        },
        validators: element.validators,
    }
}

/// Strip combinators that only wrap a single real schema.
///
/// Handles `allOf: [x]` and `anyOf`/`oneOf` where every other branch is a
/// `null` type, which is how optional fields are sometimes emitted.
fn resolve(schema: &Value) -> &Value {
    if let Some([only]) = schema.get("allOf").and_then(Value::as_array).map(Vec::as_slice) {
        if schema.get("type").is_none() && schema.get("properties").is_none() {
            return resolve(only);
        }
    }

    for combinator in ["anyOf", "oneOf"] {
        if let Some(branches) = schema.get(combinator).and_then(Value::as_array) {
            let non_null: Vec<&Value> = branches.iter().filter(|b| !is_null_schema(b)).collect();
            if let [only] = non_null.as_slice() {
                if schema.get("type").is_none() {
                    return resolve(only);
                }
            }
        }
    }

    schema
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
        || schema
            .get("enum")
            .and_then(Value::as_array)
            .is_some_and(|values| values.iter().all(Value::is_null))
}

/// The non-null entry of `type`, which may be a string or an array
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn flag(schema: &Value, name: &str) -> bool {
    schema.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn element_type(schema: &Value) -> ElementType {
    if flag(schema, "x-kubernetes-int-or-string") {
        return ElementType::new(AttributeKind::IntOrString);
    }

    let schema = resolve(schema);
    if flag(schema, "x-kubernetes-int-or-string") {
        return ElementType::new(AttributeKind::IntOrString);
    }

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .filter(|p| !p.is_empty());

    match schema_type(schema) {
        Some("string") => ElementType {
            kind: AttributeKind::String,
            validators: string_validators(schema),
        },
        Some("integer") => ElementType {
            kind: AttributeKind::Int64,
            validators: integer_validators(schema).into_iter().collect(),
        },
        Some("number") => ElementType::new(AttributeKind::Float64),
        Some("boolean") => ElementType::new(AttributeKind::Bool),
        Some("array") => {
            let items = schema
                .get("items")
                .map(element_type)
                .unwrap_or_else(|| ElementType::new(AttributeKind::Dynamic));
            ElementType::new(AttributeKind::List(Box::new(items)))
        }
        Some("object") | None if properties.is_some() => {
            let required = required_properties(schema);
            let children = properties
                .into_iter()
                .flatten()
                .map(|(name, child)| property_attribute(name, child, required.contains(&name.as_str())))
                .collect();
            ElementType::new(AttributeKind::Object(children))
        }
        Some("object") if !flag(schema, "x-kubernetes-preserve-unknown-fields") => {
            match schema.get("additionalProperties") {
                Some(values @ Value::Object(_)) => {
                    ElementType::new(AttributeKind::Map(Box::new(element_type(values))))
                }
                Some(Value::Bool(true)) => ElementType::new(AttributeKind::Map(Box::new(
                    ElementType::new(AttributeKind::Dynamic),
                ))),
                _ => ElementType::new(AttributeKind::Dynamic),
            }
        }
        other => {
            debug!("Treating schema of type {:?} as dynamic", other);
            ElementType::new(AttributeKind::Dynamic)
        }
    }
}

/// Range implied by `format` narrowed by `minimum`/`maximum`
fn integer_validators(schema: &Value) -> Option<Validator> {
    let (mut min, mut max) = match schema
        .get("format")
        .and_then(Value::as_str)
        .and_then(Validator::for_integer_format)
    {
        Some(Validator::IntRange { min, max }) => (min, max),
        _ => (None, None),
    };

    if let Some(minimum) = schema.get("minimum").and_then(bound) {
        min = Some(min.map_or(minimum, |m| m.max(minimum)));
    }
    if let Some(maximum) = schema.get("maximum").and_then(bound) {
        max = Some(max.map_or(maximum, |m| m.min(maximum)));
    }

    (min.is_some() || max.is_some()).then_some(Validator::IntRange { min, max })
}

fn bound(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e18).map(|f| f as i64))
}

fn string_validators(schema: &Value) -> Vec<Validator> {
    let mut validators = Vec::new();

    match schema.get("format").and_then(Value::as_str) {
        Some("byte") => validators.push(Validator::Base64),
        Some("date-time") => validators.push(Validator::DateTime),
        _ => {}
    }

    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        let allowed: Vec<String> = values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        if !allowed.is_empty() {
            validators.push(Validator::OneOf(allowed));
        }
    }

    validators
}
