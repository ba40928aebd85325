//! Resource schemas
//!
//! A [`Schema`] describes the configuration a resource type accepts. Schemas
//! are derived from the CRD's OpenAPI v3 definition, so the configuration
//! surface always matches the typed model the manifest is rendered from.

mod attribute;
mod convert;
mod openapi;
mod validate;

pub use attribute::{Attribute, AttributeKind, ElementType, Presence};

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use validators::Validator;

use crate::error::ProviderError;

/// Schema of a resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    /// Derive the schema of the manifest resource for a CRD.
    ///
    /// Uses the storage version of the CRD (or the first version when none is
    /// marked as storage). The resulting top-level attributes are `id`,
    /// `metadata`, `spec` (when the CRD has one) and `yaml`.
    pub fn for_crd(crd: &CustomResourceDefinition) -> Result<Self, ProviderError> {
        let kind = crd.spec.names.kind.clone();
        let invalid = |reason: &str| ProviderError::InvalidSchema {
            kind: kind.clone(),
            reason: reason.to_string(),
        };

        let version = crd
            .spec
            .versions
            .iter()
            .find(|v| v.storage)
            .or_else(|| crd.spec.versions.first())
            .ok_or_else(|| invalid("CRD has no versions"))?;

        let open_api = version
            .schema
            .as_ref()
            .and_then(|s| s.open_api_v3_schema.as_ref())
            .ok_or_else(|| invalid("CRD version has no openAPIV3Schema"))?;
        let open_api = serde_json::to_value(open_api)?;

        let namespaced = crd.spec.scope == "Namespaced";
        debug!(
            "Deriving schema for {} {} (namespaced: {})",
            kind, version.name, namespaced
        );

        let mut attributes = vec![
            Attribute::new("id", AttributeKind::String, Presence::Computed)
                .with_description("Time-based identifier of this resource."),
            metadata_attribute(namespaced),
        ];

        if let Some(spec) = open_api.pointer("/properties/spec") {
            let required = openapi::required_properties(&open_api).contains(&"spec");
            attributes.push(openapi::property_attribute("spec", spec, required));
        }

        attributes.push(
            Attribute::new("yaml", AttributeKind::String, Presence::Computed)
                .with_description("The generated manifest in YAML format."),
        );

        Ok(Self {
            description: Some(format!(
                "{} ({}/{}) rendered as a YAML manifest",
                kind, crd.spec.group, version.name
            )),
            attributes,
        })
    }

    /// Derive a schema from a bare OpenAPI object schema (no metadata handling).
    pub fn from_openapi(open_api: &Value) -> Self {
        let attribute = openapi::property_attribute("root", open_api, true);
        let attributes = match attribute.kind {
            AttributeKind::Object(children) => children,
            _ => Vec::new(),
        };
        Self {
            description: attribute.description,
            attributes,
        }
    }

    /// Look up a nested attribute by configuration names, e.g. `["spec", "issuer_ref", "name"]`.
    pub fn attribute(&self, path: &[&str]) -> Option<&Attribute> {
        let (first, rest) = path.split_first()?;
        let mut current = self.attributes.iter().find(|a| a.name == *first)?;
        for name in rest {
            current = current.children()?.iter().find(|a| a.name == *name)?;
        }
        Some(current)
    }
}

fn metadata_attribute(namespaced: bool) -> Attribute {
    let mut children = vec![Attribute::new("name", AttributeKind::String, Presence::Required)
        .with_description("Unique name of the object within its namespace or the cluster.")
        .with_validator(Validator::Name)];

    if namespaced {
        children.push(
            Attribute::new("namespace", AttributeKind::String, Presence::Required)
                .with_description("Namespace the object is created in.")
                .with_validator(Validator::Namespace),
        );
    }

    children.push(
        Attribute::new(
            "labels",
            AttributeKind::Map(Box::new(ElementType::new(AttributeKind::String))),
            Presence::Optional,
        )
        .with_description("Map of string keys and values used to organize and select objects.")
        .with_validator(Validator::Labels),
    );
    children.push(
        Attribute::new(
            "annotations",
            AttributeKind::Map(Box::new(ElementType::new(AttributeKind::String))),
            Presence::Optional,
        )
        .with_description("Unstructured key value map stored with the object.")
        .with_validator(Validator::Annotations),
    );

    Attribute::new("metadata", AttributeKind::Object(children), Presence::Required)
        .with_description("Data that helps uniquely identify the object.")
}
