//! Upstream CRD models
//!
//! Typed Rust models of the third-party Custom Resource Definitions that are
//! exposed as manifest resources. Each model is a `kube::CustomResource`, so
//! its OpenAPI schema, `apiVersion` and `kind` come from the derive.
//!
//! Status sub-resources are not modelled: manifests only carry desired state.

pub mod argocd;
pub mod cert_manager;
pub mod external_secrets;
pub mod monitoring;
pub mod references;

pub use argocd::*;
pub use cert_manager::*;
pub use external_secrets::*;
pub use monitoring::*;
pub use references::*;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;

/// CustomResourceDefinitions of every supported CRD, in registration order
pub fn all_crds() -> Vec<CustomResourceDefinition> {
    vec![
        Certificate::crd(),
        Issuer::crd(),
        ClusterIssuer::crd(),
        ServiceMonitor::crd(),
        PodMonitor::crd(),
        PrometheusRule::crd(),
        Application::crd(),
        AppProject::crd(),
        ExternalSecret::crd(),
        SecretStore::crd(),
        ClusterSecretStore::crd(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::Resource;

    #[test]
    fn test_all_crds_are_unique() {
        let crds = all_crds();
        let mut names: Vec<_> = crds
            .iter()
            .map(|crd| crd.metadata.name.clone().unwrap_or_default())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), crds.len());
        assert!(names.contains(&"certificates.cert-manager.io".to_string()));
        assert!(names.contains(&"servicemonitors.monitoring.coreos.com".to_string()));
    }

    #[test]
    fn test_scopes() {
        assert_eq!(Certificate::crd().spec.scope, "Namespaced");
        assert_eq!(ClusterIssuer::crd().spec.scope, "Cluster");
        assert_eq!(ClusterSecretStore::crd().spec.scope, "Cluster");
    }

    #[test]
    fn test_api_versions() {
        assert_eq!(Certificate::api_version(&()), "cert-manager.io/v1");
        assert_eq!(Application::api_version(&()), "argoproj.io/v1alpha1");
        assert_eq!(ExternalSecret::kind(&()), "ExternalSecret");
    }

    #[test]
    fn test_wrapper_types_survive_crd_generation() {
        let crd = serde_json::to_value(Issuer::crd()).unwrap();
        let vault = &crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"]["spec"]
            ["properties"]["vault"]["properties"];
        assert_eq!(vault["caBundle"]["format"], "byte");
        assert_eq!(vault["auth"]["x-kubernetes-preserve-unknown-fields"], true);
    }

    #[test]
    fn test_renamed_fields_keep_upstream_names() {
        let crd = serde_json::to_value(Application::crd()).unwrap();
        let source = &crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"]["spec"]
            ["properties"]["source"]["properties"];
        assert!(source.get("repoURL").is_some());

        let crd = serde_json::to_value(Certificate::crd()).unwrap();
        let spec = &crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"]["spec"];
        assert!(spec["properties"].get("isCA").is_some());
        let required: Vec<&str> = spec["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"secretName"));
        assert!(required.contains(&"issuerRef"));
    }
}
