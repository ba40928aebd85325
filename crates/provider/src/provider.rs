//! Provider registry and workflows
//!
//! A [`Provider`] owns one resource type per supported CRD and drives the
//! create/read/update/delete lifecycle against a [`StateStore`]. Resources
//! are addressed as `<type_name>.<name>`.

use std::collections::BTreeMap;

use crds::{
    AppProject, Application, Certificate, ClusterIssuer, ClusterSecretStore, ExternalSecret,
    Issuer, PodMonitor, PrometheusRule, SecretStore, ServiceMonitor,
};
use kube::{CustomResourceExt, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use crate::manifest::ManifestResource;
use crate::resource::{LifecycleResponse, RenderResponse, ResourceType};
use crate::state::StateStore;

/// Provider type name used when none is configured
pub const DEFAULT_PROVIDER_TYPE_NAME: &str = "k8s";

/// Registry of manifest resource types
pub struct Provider {
    type_name: String,
    resources: BTreeMap<String, Box<dyn ResourceType>>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("type_name", &self.type_name)
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Provider {
    /// Create a provider with every supported CRD registered.
    pub fn new(type_name: &str) -> Result<Self, ProviderError> {
        let mut provider = Self::empty(type_name)?;

        provider.register::<Certificate>()?;
        provider.register::<Issuer>()?;
        provider.register::<ClusterIssuer>()?;
        provider.register::<ServiceMonitor>()?;
        provider.register::<PodMonitor>()?;
        provider.register::<PrometheusRule>()?;
        provider.register::<Application>()?;
        provider.register::<AppProject>()?;
        provider.register::<ExternalSecret>()?;
        provider.register::<SecretStore>()?;
        provider.register::<ClusterSecretStore>()?;

        info!(
            "Provider {} registered {} resource types",
            provider.type_name,
            provider.resources.len()
        );
        Ok(provider)
    }

    /// Create a provider with no resource types.
    pub fn empty(type_name: &str) -> Result<Self, ProviderError> {
        if !is_identifier(type_name) {
            return Err(ProviderError::InvalidTypeName(type_name.to_string()));
        }

        Ok(Self {
            type_name: type_name.to_string(),
            resources: BTreeMap::new(),
        })
    }

    /// Register the manifest resource type for CRD model `K`.
    pub fn register<K>(&mut self) -> Result<(), ProviderError>
    where
        K: Resource<DynamicType = ()> + CustomResourceExt + Serialize + DeserializeOwned + 'static,
    {
        let resource = ManifestResource::<K>::new(&self.type_name)?;
        self.register_resource(Box::new(resource));
        Ok(())
    }

    /// Register an arbitrary resource type, replacing one with the same name.
    pub fn register_resource(&mut self, resource: Box<dyn ResourceType>) {
        let name = resource.type_name().to_string();
        debug!("Registering resource type {}", name);
        if self.resources.insert(name.clone(), resource).is_some() {
            warn!("Resource type {} registered twice, keeping the latest", name);
        }
    }

    /// Provider type name, the prefix of every resource type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Registered resource types, ordered by type name
    pub fn resource_types(&self) -> impl Iterator<Item = &dyn ResourceType> {
        self.resources.values().map(|r| r.as_ref())
    }

    /// Look up a resource type by name.
    pub fn resource(&self, type_name: &str) -> Result<&dyn ResourceType, ProviderError> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    /// Render configuration without touching state.
    pub fn render(&self, type_name: &str, config: &Value) -> Result<RenderResponse, ProviderError> {
        Ok(self.resource(type_name)?.render(config))
    }

    /// Create or update `<type_name>.<name>` from configuration.
    ///
    /// State is written only when the lifecycle operation produced no error
    /// diagnostics.
    pub fn apply(
        &self,
        store: &dyn StateStore,
        type_name: &str,
        name: &str,
        config: &Value,
    ) -> Result<LifecycleResponse, ProviderError> {
        let resource = self.resource(type_name)?;
        let address = address(type_name, name)?;

        let response = match store.get(&address)? {
            Some(prior) => {
                if prior.type_name != type_name {
                    return Err(ProviderError::TypeMismatch {
                        address,
                        actual: prior.type_name,
                        expected: type_name.to_string(),
                    });
                }
                debug!("{} exists in state, updating", address);
                resource.update(&prior, config)
            }
            None => {
                debug!("{} not in state, creating", address);
                resource.create(config)
            }
        };

        if !response.diagnostics.has_error() {
            if let Some(state) = &response.state {
                store.put(&address, state.clone())?;
                info!("Applied {}", address);
            }
        }
        Ok(response)
    }

    /// Read `address` back through its resource type and store the result.
    pub fn refresh(
        &self,
        store: &dyn StateStore,
        address: &str,
    ) -> Result<LifecycleResponse, ProviderError> {
        let (type_name, _) = split_address(address)?;
        let resource = self.resource(type_name)?;
        let state = store
            .get(address)?
            .ok_or_else(|| ProviderError::NotInState(address.to_string()))?;

        let response = resource.read(state);
        if !response.diagnostics.has_error() {
            if let Some(state) = &response.state {
                store.put(address, state.clone())?;
            }
        }
        debug!("Refreshed {}", address);
        Ok(response)
    }

    /// Delete `address` and drop it from state.
    pub fn destroy(
        &self,
        store: &dyn StateStore,
        address: &str,
    ) -> Result<Diagnostics, ProviderError> {
        let (type_name, _) = split_address(address)?;
        let resource = self.resource(type_name)?;
        let state = store
            .get(address)?
            .ok_or_else(|| ProviderError::NotInState(address.to_string()))?;

        let diagnostics = resource.delete(&state);
        if !diagnostics.has_error() {
            store.remove(address)?;
            info!("Destroyed {}", address);
        }
        Ok(diagnostics)
    }
}

/// Build the state address of a resource.
pub fn address(type_name: &str, name: &str) -> Result<String, ProviderError> {
    if !is_identifier(type_name) {
        return Err(ProviderError::InvalidAddress(format!(
            "invalid resource type name {:?}",
            type_name
        )));
    }
    if !is_identifier(name) {
        return Err(ProviderError::InvalidAddress(format!(
            "resource name {:?} must start with a letter or underscore and contain only letters, digits, '_' and '-'",
            name
        )));
    }
    Ok(format!("{}.{}", type_name, name))
}

fn split_address(address: &str) -> Result<(&str, &str), ProviderError> {
    match address.split_once('.') {
        Some((type_name, name)) if is_identifier(type_name) && is_identifier(name) => {
            Ok((type_name, name))
        }
        _ => Err(ProviderError::InvalidAddress(address.to_string())),
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use serde_json::json;

    const CERTIFICATE: &str = "k8s_cert_manager_io_certificate_v1_manifest";

    fn certificate_config(secret_name: &str) -> Value {
        json!({
            "metadata": { "name": "web", "namespace": "default" },
            "spec": {
                "secret_name": secret_name,
                "issuer_ref": { "name": "letsencrypt" }
            }
        })
    }

    #[test]
    fn test_registers_all_crds() {
        let provider = Provider::new(DEFAULT_PROVIDER_TYPE_NAME).unwrap();
        let names: Vec<_> = provider.resource_types().map(|r| r.type_name()).collect();

        assert_eq!(names.len(), 11);
        assert!(names.contains(&CERTIFICATE));
        assert!(names.contains(&"k8s_monitoring_coreos_com_service_monitor_v1_manifest"));
        assert!(names.contains(&"k8s_argoproj_io_app_project_v1alpha1_manifest"));
        assert!(names.contains(&"k8s_external_secrets_io_cluster_secret_store_v1beta1_manifest"));
    }

    #[test]
    fn test_custom_provider_type_name() {
        let provider = Provider::new("acme").unwrap();
        assert!(provider.resource("acme_cert_manager_io_issuer_v1_manifest").is_ok());
        assert!(matches!(
            Provider::new("9lives"),
            Err(ProviderError::InvalidTypeName(name)) if name == "9lives"
        ));
    }

    #[test]
    fn test_unknown_resource_type() {
        let provider = Provider::new("k8s").unwrap();
        let err = provider.render("k8s_nope_manifest", &json!({})).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResourceType(_)));
    }

    #[test]
    fn test_address() {
        assert_eq!(address(CERTIFICATE, "web").unwrap(), format!("{}.web", CERTIFICATE));
        assert!(address(CERTIFICATE, "web.tls").is_err());
        assert!(address(CERTIFICATE, "").is_err());
        assert!(split_address("no-dot").is_err());
    }

    #[test]
    fn test_apply_creates_then_updates() {
        let provider = Provider::new("k8s").unwrap();
        let store = MemoryStateStore::new();

        let created = provider
            .apply(&store, CERTIFICATE, "web", &certificate_config("web-tls"))
            .unwrap()
            .state
            .unwrap();
        let updated = provider
            .apply(&store, CERTIFICATE, "web", &certificate_config("web-tls-2"))
            .unwrap()
            .state
            .unwrap();

        assert_eq!(created.id, updated.id);
        let stored = store.get(&address(CERTIFICATE, "web").unwrap()).unwrap().unwrap();
        assert_eq!(stored, updated);
        assert!(stored.yaml.contains("secretName: web-tls-2"));
    }

    #[test]
    fn test_apply_with_errors_leaves_state_untouched() {
        let provider = Provider::new("k8s").unwrap();
        let store = MemoryStateStore::new();

        let response = provider
            .apply(&store, CERTIFICATE, "web", &json!({ "metadata": { "name": "web" } }))
            .unwrap();

        assert!(response.diagnostics.has_error());
        assert!(response.state.is_none());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_refresh_and_destroy() {
        let provider = Provider::new("k8s").unwrap();
        let store = MemoryStateStore::new();
        let address = address(CERTIFICATE, "web").unwrap();

        let created = provider
            .apply(&store, CERTIFICATE, "web", &certificate_config("web-tls"))
            .unwrap()
            .state
            .unwrap();

        let refreshed = provider.refresh(&store, &address).unwrap();
        assert_eq!(refreshed.state, Some(created));

        let diagnostics = provider.destroy(&store, &address).unwrap();
        assert!(diagnostics.is_empty());
        assert!(store.get(&address).unwrap().is_none());

        assert!(matches!(
            provider.destroy(&store, &address),
            Err(ProviderError::NotInState(_))
        ));
    }
}
