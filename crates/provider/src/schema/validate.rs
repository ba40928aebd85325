//! Configuration validation against a schema

use serde_json::{Map, Value};
use validators::Validator;

use super::attribute::{Attribute, AttributeKind, Presence};
use super::Schema;
use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics};

impl Schema {
    /// Validate a configuration object.
    ///
    /// Every problem is reported; validation does not stop at the first error.
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        match config {
            Value::Object(map) => {
                validate_object(&self.attributes, map, &AttributePath::root(), &mut diagnostics)
            }
            other => diagnostics.push(Diagnostic::error(
                "Invalid configuration",
                format!("Configuration must be an object, got {}.", json_type(other)),
            )),
        }
        diagnostics
    }
}

fn validate_object(
    attributes: &[Attribute],
    map: &Map<String, Value>,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    for key in map.keys() {
        if !attributes.iter().any(|a| &a.name == key) {
            diagnostics.push(
                Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named {:?} is not expected here.", key),
                )
                .with_attribute(path.attribute(key)),
            );
        }
    }

    for attribute in attributes {
        let value = map.get(&attribute.name).filter(|v| !v.is_null());
        let attribute_path = path.attribute(&attribute.name);

        match (attribute.presence, value) {
            (Presence::Computed, Some(_)) => diagnostics.push(
                Diagnostic::error(
                    "Invalid configuration: computed attribute",
                    format!(
                        "The attribute {:?} is set by the provider and cannot be configured.",
                        attribute.name
                    ),
                )
                .with_attribute(attribute_path),
            ),
            (Presence::Required, None) => diagnostics.push(
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument {:?} is required, but no definition was found.", attribute.name),
                )
                .with_attribute(attribute_path),
            ),
            (_, Some(value)) => validate_value(
                &attribute.kind,
                &attribute.validators,
                value,
                &attribute_path,
                diagnostics,
            ),
            (_, None) => {}
        }
    }
}

fn validate_value(
    kind: &AttributeKind,
    validators: &[Validator],
    value: &Value,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    let type_matches = match (kind, value) {
        (AttributeKind::String, Value::String(_)) => true,
        (AttributeKind::Int64, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (AttributeKind::Float64, Value::Number(_)) => true,
        (AttributeKind::Bool, Value::Bool(_)) => true,
        (AttributeKind::IntOrString, Value::String(_)) => true,
        (AttributeKind::IntOrString, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (AttributeKind::Dynamic, _) => true,
        (AttributeKind::List(element), Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                validate_value(
                    &element.kind,
                    &element.validators,
                    item,
                    &path.index(index),
                    diagnostics,
                );
            }
            true
        }
        (AttributeKind::Map(element), Value::Object(entries)) => {
            for (key, item) in entries {
                validate_value(
                    &element.kind,
                    &element.validators,
                    item,
                    &path.key(key),
                    diagnostics,
                );
            }
            true
        }
        (AttributeKind::Object(children), Value::Object(map)) => {
            validate_object(children, map, path, diagnostics);
            true
        }
        _ => false,
    };

    if !type_matches {
        diagnostics.push(
            Diagnostic::error(
                "Incorrect attribute value type",
                format!("Expected {}, got {}.", kind.type_label(), json_type(value)),
            )
            .with_attribute(path.clone()),
        );
        return;
    }

    for validator in validators {
        if let Err(e) = validator.validate(value) {
            diagnostics.push(
                Diagnostic::error("Invalid attribute value", e.to_string())
                    .with_attribute(path.clone()),
            );
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
