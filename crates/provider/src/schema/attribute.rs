//! Attribute model

use serde::{Serialize, Serializer};
use validators::Validator;

/// Whether an attribute is supplied by the user or by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Must be configured
    Required,
    /// May be configured
    Optional,
    /// Set by the provider, never configured
    Computed,
}

/// Element type of a list or map attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementType {
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_validators")]
    pub validators: Vec<Validator>,
}

impl ElementType {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            validators: Vec::new(),
        }
    }
}

/// Validator as shown in schema output, with its description
#[derive(Serialize)]
struct DescribedValidator<'a> {
    #[serde(flatten)]
    validator: &'a Validator,
    description: String,
}

fn serialize_validators<S: Serializer>(validators: &[Validator], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(validators.iter().map(|validator| DescribedValidator {
        validator,
        description: validator.description(),
    }))
}

/// Value type of an attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "of")]
pub enum AttributeKind {
    String,
    Int64,
    Float64,
    Bool,
    /// Integer or string (`x-kubernetes-int-or-string`)
    IntOrString,
    /// Any JSON value, passed through untouched
    Dynamic,
    List(Box<ElementType>),
    Map(Box<ElementType>),
    /// Nested attributes
    Object(Vec<Attribute>),
}

impl AttributeKind {
    /// Short type label used in diagnostics
    pub fn type_label(&self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Int64 => "number (integer)",
            AttributeKind::Float64 => "number",
            AttributeKind::Bool => "bool",
            AttributeKind::IntOrString => "number (integer) or string",
            AttributeKind::Dynamic => "any value",
            AttributeKind::List(_) => "list",
            AttributeKind::Map(_) => "map",
            AttributeKind::Object(_) => "object",
        }
    }
}

/// A configurable (or computed) attribute of a resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name in configuration (snake_case)
    pub name: String,
    /// Property name in the rendered manifest (camelCase)
    pub json_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: AttributeKind,
    pub presence: Presence,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_validators")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    /// Attribute whose configuration name equals its manifest name
    pub fn new(name: &str, kind: AttributeKind, presence: Presence) -> Self {
        Self {
            name: name.to_string(),
            json_name: name.to_string(),
            description: None,
            kind,
            presence,
            validators: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn is_computed(&self) -> bool {
        self.presence == Presence::Computed
    }

    /// Nested attributes of an object attribute
    pub fn children(&self) -> Option<&[Attribute]> {
        match &self.kind {
            AttributeKind::Object(children) => Some(children),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validators_serialize_with_description() {
        let attribute = Attribute::new("size", AttributeKind::Int64, Presence::Optional)
            .with_validator(Validator::IntRange { min: Some(0), max: None });

        let value = serde_json::to_value(&attribute).unwrap();
        assert_eq!(
            value["validators"],
            json!([{
                "type": "int_range",
                "values": { "min": 0, "max": null },
                "description": "value must be at least 0"
            }])
        );
    }

    #[test]
    fn test_element_validators_serialize_with_description() {
        let element = ElementType {
            kind: AttributeKind::String,
            validators: vec![Validator::OneOf(vec!["In".to_string()])],
        };
        let list = Attribute::new("operators", AttributeKind::List(Box::new(element)), Presence::Optional);

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(
            value["kind"]["of"]["validators"][0]["description"],
            "value must be one of: In"
        );
        assert!(value.get("validators").is_none());
    }
}
