//! Configuration to manifest conversion

use serde_json::{Map, Value};
use utilities::prune_nulls;

use super::attribute::{Attribute, AttributeKind};
use super::Schema;

impl Schema {
    /// Convert validated configuration into the manifest's JSON shape.
    ///
    /// Attribute names are replaced by their manifest (camelCase) names,
    /// computed attributes and `null`s are dropped, and map keys as well as
    /// dynamic values are passed through as configured. Keys without a
    /// matching attribute are dropped, so callers validate first.
    pub fn to_manifest(&self, config: &Value) -> Value {
        match config {
            Value::Object(map) => Value::Object(convert_object(&self.attributes, map)),
            _ => Value::Object(Map::new()),
        }
    }
}

fn convert_object(attributes: &[Attribute], map: &Map<String, Value>) -> Map<String, Value> {
    attributes
        .iter()
        .filter(|attribute| !attribute.is_computed())
        .filter_map(|attribute| {
            map.get(&attribute.name)
                .filter(|value| !value.is_null())
                .map(|value| (attribute.json_name.clone(), convert_value(&attribute.kind, value)))
        })
        .collect()
}

fn convert_value(kind: &AttributeKind, value: &Value) -> Value {
    match (kind, value) {
        (AttributeKind::Object(children), Value::Object(map)) => {
            Value::Object(convert_object(children, map))
        }
        (AttributeKind::List(element), Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|item| convert_value(&element.kind, item))
                .collect(),
        ),
        (AttributeKind::Map(element), Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .filter(|(_, item)| !item.is_null())
                .map(|(key, item)| (key.clone(), convert_value(&element.kind, item)))
                .collect(),
        ),
        (AttributeKind::Dynamic, other) => prune_nulls(other.clone()),
        (_, other) => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renames_nested_attributes() {
        let schema = Schema::from_openapi(&json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "object",
                    "properties": {
                        "repoURL": { "type": "string" },
                        "targetRevision": { "type": "string" }
                    }
                },
                "syncOptions": { "type": "array", "items": { "type": "string" } },
                "ignoreDifferences": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "jsonPointers": { "type": "array", "items": { "type": "string" } } }
                    }
                }
            }
        }));

        let manifest = schema.to_manifest(&json!({
            "source": { "repo_url": "https://github.com/example/apps", "target_revision": "HEAD" },
            "sync_options": ["CreateNamespace=true"],
            "ignore_differences": [{ "json_pointers": ["/spec/replicas"] }]
        }));

        assert_eq!(
            manifest,
            json!({
                "source": { "repoURL": "https://github.com/example/apps", "targetRevision": "HEAD" },
                "syncOptions": ["CreateNamespace=true"],
                "ignoreDifferences": [{ "jsonPointers": ["/spec/replicas"] }]
            })
        );
    }

    #[test]
    fn test_map_keys_and_dynamic_values_are_verbatim() {
        let schema = Schema::from_openapi(&json!({
            "type": "object",
            "properties": {
                "matchLabels": { "type": "object", "additionalProperties": { "type": "string" } },
                "provider": { "type": "object", "x-kubernetes-preserve-unknown-fields": true }
            }
        }));

        let manifest = schema.to_manifest(&json!({
            "match_labels": { "app.kubernetes.io/name": "web" },
            "provider": { "aws": { "service": "SecretsManager", "role": null } }
        }));

        assert_eq!(
            manifest,
            json!({
                "matchLabels": { "app.kubernetes.io/name": "web" },
                "provider": { "aws": { "service": "SecretsManager" } }
            })
        );
    }

    #[test]
    fn test_drops_nulls_and_computed() {
        let schema = Schema {
            description: None,
            attributes: vec![
                Attribute::new("id", AttributeKind::String, crate::schema::Presence::Computed),
                Attribute::new("name", AttributeKind::String, crate::schema::Presence::Optional),
                Attribute::new("path", AttributeKind::String, crate::schema::Presence::Optional),
            ],
        };
        let manifest = schema.to_manifest(&json!({ "id": "1", "name": "web", "path": null }));
        assert_eq!(manifest, json!({ "name": "web" }));
    }
}
