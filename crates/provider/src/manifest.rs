//! Manifest resources for typed CRDs
//!
//! [`ManifestResource`] implements the resource lifecycle once for every
//! `kube::CustomResource`. Configuration is validated against the derived
//! schema, converted to the CRD's JSON shape, deserialized into the typed
//! model and rendered as YAML with `apiVersion`, `kind`, `metadata` and `spec`
//! in that order.

use std::fmt;
use std::marker::PhantomData;

use kube::{CustomResourceExt, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use utilities::{generate_id, prune_nulls, resource_type_name};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ProviderError;
use crate::resource::{LifecycleResponse, RenderResponse, ResourceType};
use crate::schema::Schema;
use crate::state::ResourceState;

/// Summary used for every rendering failure
const MARSHAL_ERROR_SUMMARY: &str = "Unable to marshal YAML";

/// Manifest resource backed by the typed CRD model `K`
pub struct ManifestResource<K> {
    type_name: String,
    api_version: String,
    kind: String,
    schema: Schema,
    _model: PhantomData<fn() -> K>,
}

impl<K> fmt::Debug for ManifestResource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestResource")
            .field("type_name", &self.type_name)
            .field("api_version", &self.api_version)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<K> ManifestResource<K>
where
    K: Resource<DynamicType = ()> + CustomResourceExt + Serialize + DeserializeOwned,
{
    /// Build the resource type for `K` under the given provider type name.
    pub fn new(provider_type_name: &str) -> Result<Self, ProviderError> {
        let schema = Schema::for_crd(&K::crd())?;
        let type_name = resource_type_name(
            provider_type_name,
            &K::group(&()),
            &K::kind(&()),
            &K::version(&()),
        );

        Ok(Self {
            type_name,
            api_version: K::api_version(&()).into_owned(),
            kind: K::kind(&()).into_owned(),
            schema,
            _model: PhantomData,
        })
    }

    /// Render validated configuration to YAML.
    fn to_yaml(&self, config: &Value) -> Result<String, ProviderError> {
        let manifest = self.schema.to_manifest(config);

        let mut object = Map::new();
        object.insert("apiVersion".to_string(), Value::String(self.api_version.clone()));
        object.insert("kind".to_string(), Value::String(self.kind.clone()));
        for key in ["metadata", "spec"] {
            if let Some(value) = manifest.get(key) {
                object.insert(key.to_string(), value.clone());
            }
        }

        let typed: K = serde_json::from_value(Value::Object(object))?;
        let rendered = prune_nulls(serde_json::to_value(&typed)?);

        let mut document = serde_yaml::Mapping::new();
        document.insert("apiVersion".into(), self.api_version.as_str().into());
        document.insert("kind".into(), self.kind.as_str().into());
        for key in ["metadata", "spec"] {
            if let Some(value) = rendered.get(key) {
                document.insert(key.into(), serde_yaml::to_value(value)?);
            }
        }

        Ok(serde_yaml::to_string(&document)?)
    }

    /// Validate then render, collecting every problem as a diagnostic
    fn validated_yaml(&self, config: &Value) -> (Option<String>, Diagnostics) {
        let mut diagnostics = self.validate_config(config);
        if diagnostics.has_error() {
            debug!(
                "{}: configuration rejected with {} diagnostic(s)",
                self.type_name,
                diagnostics.len()
            );
            return (None, diagnostics);
        }

        match self.to_yaml(config) {
            Ok(yaml) => (Some(yaml), diagnostics),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    MARSHAL_ERROR_SUMMARY,
                    format!(
                        "An unexpected error occurred while rendering the {} manifest: {}",
                        self.kind, e
                    ),
                ));
                (None, diagnostics)
            }
        }
    }
}

impl<K> ResourceType for ManifestResource<K>
where
    K: Resource<DynamicType = ()> + CustomResourceExt + Serialize + DeserializeOwned,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn render(&self, config: &Value) -> RenderResponse {
        let (yaml, diagnostics) = self.validated_yaml(config);
        RenderResponse { yaml, diagnostics }
    }

    fn create(&self, config: &Value) -> LifecycleResponse {
        let (yaml, diagnostics) = self.validated_yaml(config);
        let Some(yaml) = yaml else {
            return LifecycleResponse::failure(diagnostics);
        };

        let id = generate_id();
        info!("Created {} with id {}", self.type_name, id);
        LifecycleResponse::success(
            ResourceState {
                type_name: self.type_name.clone(),
                id,
                yaml,
                attributes: config.clone(),
            },
            diagnostics,
        )
    }

    fn read(&self, state: ResourceState) -> LifecycleResponse {
        debug!("Read {} with id {}", self.type_name, state.id);
        LifecycleResponse::success(state, Diagnostics::new())
    }

    fn update(&self, prior: &ResourceState, config: &Value) -> LifecycleResponse {
        if prior.type_name != self.type_name {
            return LifecycleResponse::failure(
                Diagnostic::error(
                    "Resource type mismatch",
                    format!(
                        "Prior state belongs to {}, cannot update it as {}.",
                        prior.type_name, self.type_name
                    ),
                )
                .into(),
            );
        }

        let (yaml, diagnostics) = self.validated_yaml(config);
        let Some(yaml) = yaml else {
            return LifecycleResponse::failure(diagnostics);
        };

        info!("Updated {} with id {}", self.type_name, prior.id);
        LifecycleResponse::success(
            ResourceState {
                type_name: self.type_name.clone(),
                id: prior.id.clone(),
                yaml,
                attributes: config.clone(),
            },
            diagnostics,
        )
    }

    fn delete(&self, state: &ResourceState) -> Diagnostics {
        info!("Deleted {} with id {}", self.type_name, state.id);
        Diagnostics::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::{Certificate, ClusterIssuer};
    use kube::CustomResource;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    /// Model whose schema is looser than its deserializer: an `IpAddr` is a
    /// plain string in OpenAPI but must parse as an address.
    #[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
    #[kube(group = "example.com", version = "v1", kind = "Listener", namespaced)]
    pub struct ListenerSpec {
        address: std::net::IpAddr,
    }

    fn certificate() -> ManifestResource<Certificate> {
        ManifestResource::new("k8s").unwrap()
    }

    fn config() -> Value {
        json!({
            "metadata": {
                "name": "web",
                "namespace": "default",
                "labels": { "app.kubernetes.io/name": "web" }
            },
            "spec": {
                "secret_name": "web-tls",
                "dns_names": ["web.example.com", "www.example.com"],
                "is_ca": false,
                "usages": ["server auth"],
                "private_key": { "algorithm": "ECDSA", "size": 256 },
                "issuer_ref": { "name": "letsencrypt", "kind": "ClusterIssuer" }
            }
        })
    }

    #[test]
    fn test_type_name_and_stamps() {
        let resource = certificate();
        assert_eq!(resource.type_name(), "k8s_cert_manager_io_certificate_v1_manifest");
        assert_eq!(resource.api_version(), "cert-manager.io/v1");
        assert_eq!(resource.kind(), "Certificate");
    }

    #[test]
    fn test_yaml_starts_with_api_version_and_kind() {
        let yaml = certificate().render(&config()).yaml.unwrap();
        assert!(
            yaml.starts_with("apiVersion: cert-manager.io/v1\nkind: Certificate\nmetadata:\n"),
            "unexpected yaml:\n{}",
            yaml
        );
    }

    #[test]
    fn test_yaml_uses_manifest_names() {
        let yaml = certificate().render(&config()).yaml.unwrap();
        let document: Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(document["spec"]["secretName"], "web-tls");
        assert_eq!(document["spec"]["isCA"], false);
        assert_eq!(document["spec"]["issuerRef"]["kind"], "ClusterIssuer");
        assert_eq!(document["spec"]["privateKey"]["algorithm"], "ECDSA");
        assert_eq!(document["metadata"]["labels"]["app.kubernetes.io/name"], "web");
        assert!(document["spec"].get("secret_name").is_none());
    }

    #[test]
    fn test_unconfigured_fields_are_absent() {
        let yaml = certificate().render(&config()).yaml.unwrap();
        let document: Value = serde_yaml::from_str(&yaml).unwrap();
        let spec = document["spec"].as_object().unwrap();
        assert!(!spec.contains_key("commonName"));
        assert!(!spec.contains_key("ipAddresses"));
        assert!(!yaml.contains("null"));
        assert!(document.get("status").is_none());
    }

    #[test]
    fn test_yaml_parses_back_into_typed_model() {
        let yaml = certificate().render(&config()).yaml.unwrap();
        let parsed: Certificate = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.metadata.name.as_deref(), Some("web"));
        assert_eq!(parsed.spec.secret_name, "web-tls");
        assert_eq!(parsed.spec.dns_names.len(), 2);
    }

    #[test]
    fn test_create_assigns_id_and_keeps_config() {
        let response = certificate().create(&config());
        assert!(response.diagnostics.is_empty());
        let state = response.state.unwrap();
        assert!(state.id.parse::<i64>().is_ok());
        assert_eq!(state.attributes, config());
        assert_eq!(state.type_name, "k8s_cert_manager_io_certificate_v1_manifest");
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let mut config = config();
        config["metadata"]["name"] = json!("Not A Name");
        config["spec"]["usages"] = json!(["teleport"]);

        let response = certificate().create(&config);
        assert!(response.state.is_none());
        assert!(response.diagnostics.has_error());
        assert_eq!(response.diagnostics.len(), 2);
    }

    #[test]
    fn test_update_keeps_id() {
        let resource = certificate();
        let created = resource.create(&config()).state.unwrap();

        let mut changed = config();
        changed["spec"]["secret_name"] = json!("web-tls-v2");
        let updated = resource.update(&created, &changed).state.unwrap();

        assert_eq!(updated.id, created.id);
        assert!(updated.yaml.contains("secretName: web-tls-v2"));
        assert_eq!(updated.attributes, changed);
    }

    #[test]
    fn test_update_refuses_foreign_state() {
        let issuer: ManifestResource<ClusterIssuer> = ManifestResource::new("k8s").unwrap();
        let created = certificate().create(&config()).state.unwrap();

        let response = issuer.update(&created, &json!({ "metadata": { "name": "ca" }, "spec": {} }));
        assert!(response.state.is_none());
        assert_eq!(
            response.diagnostics.iter().next().unwrap().summary,
            "Resource type mismatch"
        );
    }

    #[test]
    fn test_render_failure_is_reported_without_state() {
        let listener: ManifestResource<Listener> = ManifestResource::new("k8s").unwrap();
        let config = json!({
            "metadata": { "name": "edge", "namespace": "default" },
            "spec": { "address": "not-an-address" }
        });

        assert!(listener.validate_config(&config).is_empty());

        let response = listener.create(&config);
        assert!(response.state.is_none());
        let diagnostics: Vec<_> = response.diagnostics.iter().collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Unable to marshal YAML");
        assert!(diagnostics[0].detail.contains("Listener"));
        assert!(diagnostics[0].attribute.is_none());

        let rendered = listener.render(&json!({
            "metadata": { "name": "edge", "namespace": "default" },
            "spec": { "address": "10.0.0.1" }
        }));
        assert!(rendered.yaml.unwrap().contains("address: 10.0.0.1"));
    }

    #[test]
    fn test_out_of_range_integers_fail_validation() {
        let mut config = config();
        config["spec"]["revision_history_limit"] = json!(3_000_000_000_u64);

        let resource = certificate();
        let diagnostics = resource.validate_config(&config);
        let diagnostic = diagnostics.errors().next().unwrap();
        assert_eq!(diagnostic.summary, "Invalid attribute value");
        assert_eq!(
            diagnostic.attribute.as_ref().unwrap().to_string(),
            "spec.revision_history_limit"
        );
        assert!(resource.create(&config).state.is_none());
    }

    #[test]
    fn test_computed_attributes_are_rejected() {
        let mut config = config();
        config["id"] = json!("1700000000000000000");
        config["yaml"] = json!("kind: Certificate\n");

        let response = certificate().create(&config);
        assert!(response.state.is_none());
        let mut paths: Vec<_> = response
            .diagnostics
            .iter()
            .map(|d| {
                assert_eq!(d.summary, "Invalid configuration: computed attribute");
                d.attribute.as_ref().unwrap().to_string()
            })
            .collect();
        paths.sort();
        assert_eq!(paths, vec!["id", "yaml"]);
    }

    #[test]
    fn test_read_and_delete_are_no_ops() {
        let resource = certificate();
        let created = resource.create(&config()).state.unwrap();

        let read = resource.read(created.clone());
        assert_eq!(read.state, Some(created.clone()));
        assert!(resource.delete(&created).is_empty());
    }
}
