//! End-to-end lifecycle tests across every registered CRD

use crds::{
    AppProject, Application, Certificate, ClusterIssuer, ClusterSecretStore, ExternalSecret,
    Issuer, PodMonitor, PrometheusRule, SecretStore, ServiceMonitor,
};
use k8s_manifest_provider::{
    address, FileStateStore, MemoryStateStore, Provider, ProviderError, StateStore,
    DEFAULT_PROVIDER_TYPE_NAME,
};
use kube::Resource;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn provider() -> Provider {
    Provider::new(DEFAULT_PROVIDER_TYPE_NAME).unwrap()
}

/// Render `config` and parse the YAML back into the typed model.
fn round_trip<K>(type_name: &str, config: Value) -> K
where
    K: Resource<DynamicType = ()> + DeserializeOwned,
{
    let response = provider().render(type_name, &config).unwrap();
    assert!(
        response.diagnostics.is_empty(),
        "{} diagnostics: {:?}",
        type_name,
        response.diagnostics
    );
    let yaml = response.yaml.unwrap();

    let document: Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(document["apiVersion"], &*K::api_version(&()));
    assert_eq!(document["kind"], &*K::kind(&()));

    serde_yaml::from_str(&yaml).unwrap()
}

#[test]
fn test_certificate() {
    let certificate: Certificate = round_trip(
        "k8s_cert_manager_io_certificate_v1_manifest",
        json!({
            "metadata": { "name": "api", "namespace": "prod" },
            "spec": {
                "secret_name": "api-tls",
                "common_name": "api.example.com",
                "duration": "2160h",
                "subject": { "organizations": ["Example"] },
                "issuer_ref": { "name": "ca", "kind": "Issuer" }
            }
        }),
    );
    assert_eq!(certificate.spec.common_name.as_deref(), Some("api.example.com"));
    assert_eq!(certificate.metadata.namespace.as_deref(), Some("prod"));
}

#[test]
fn test_issuer() {
    let issuer: Issuer = round_trip(
        "k8s_cert_manager_io_issuer_v1_manifest",
        json!({
            "metadata": { "name": "ca", "namespace": "prod" },
            "spec": { "ca": { "secret_name": "root-ca" } }
        }),
    );
    assert_eq!(issuer.spec.ca.unwrap().secret_name, "root-ca");
}

#[test]
fn test_cluster_issuer() {
    let issuer: ClusterIssuer = round_trip(
        "k8s_cert_manager_io_cluster_issuer_v1_manifest",
        json!({
            "metadata": { "name": "letsencrypt" },
            "spec": {
                "acme": {
                    "server": "https://acme-v02.api.letsencrypt.org/directory",
                    "email": "ops@example.com",
                    "private_key_secret_ref": { "name": "letsencrypt-account" },
                    "solvers": [
                        { "dns01": { "cloudflare": { "email": "ops@example.com" } } }
                    ]
                }
            }
        }),
    );
    assert!(issuer.metadata.namespace.is_none());
    let acme = issuer.spec.acme.unwrap();
    assert_eq!(acme.private_key_secret_ref.name, "letsencrypt-account");
    assert_eq!(
        acme.solvers[0].dns01.as_ref().unwrap().as_value()["cloudflare"]["email"],
        "ops@example.com"
    );
}

#[test]
fn test_service_monitor() {
    let monitor: ServiceMonitor = round_trip(
        "k8s_monitoring_coreos_com_service_monitor_v1_manifest",
        json!({
            "metadata": { "name": "api", "namespace": "monitoring" },
            "spec": {
                "selector": { "match_labels": { "app": "api" } },
                "endpoints": [
                    { "port": "metrics", "interval": "30s" },
                    { "target_port": 9090, "path": "/federate" }
                ]
            }
        }),
    );
    assert_eq!(monitor.spec.endpoints.len(), 2);
    assert_eq!(monitor.spec.selector.match_labels["app"], "api");
}

#[test]
fn test_pod_monitor() {
    let monitor: PodMonitor = round_trip(
        "k8s_monitoring_coreos_com_pod_monitor_v1_manifest",
        json!({
            "metadata": { "name": "workers", "namespace": "monitoring" },
            "spec": {
                "selector": {},
                "pod_metrics_endpoints": [{ "port": "http" }]
            }
        }),
    );
    assert_eq!(monitor.spec.pod_metrics_endpoints[0].port.as_deref(), Some("http"));
}

#[test]
fn test_prometheus_rule() {
    let rule: PrometheusRule = round_trip(
        "k8s_monitoring_coreos_com_prometheus_rule_v1_manifest",
        json!({
            "metadata": { "name": "api", "namespace": "monitoring" },
            "spec": {
                "groups": [{
                    "name": "api.rules",
                    "rules": [{
                        "alert": "ApiDown",
                        "expr": "up{job=\"api\"} == 0",
                        "for": "5m",
                        "labels": { "severity": "critical" }
                    }]
                }]
            }
        }),
    );
    let alert = &rule.spec.groups[0].rules[0];
    assert_eq!(alert.for_duration.as_deref(), Some("5m"));
}

#[test]
fn test_application() {
    let application: Application = round_trip(
        "k8s_argoproj_io_application_v1alpha1_manifest",
        json!({
            "metadata": { "name": "guestbook", "namespace": "argocd" },
            "spec": {
                "project": "default",
                "source": {
                    "repo_url": "https://github.com/argoproj/argocd-example-apps.git",
                    "path": "guestbook",
                    "target_revision": "HEAD"
                },
                "destination": {
                    "server": "https://kubernetes.default.svc",
                    "namespace": "guestbook"
                },
                "sync_policy": { "automated": { "prune": true, "self_heal": true } }
            }
        }),
    );
    assert_eq!(
        application.spec.source.unwrap().repo_url,
        "https://github.com/argoproj/argocd-example-apps.git"
    );
}

#[test]
fn test_app_project() {
    let project: AppProject = round_trip(
        "k8s_argoproj_io_app_project_v1alpha1_manifest",
        json!({
            "metadata": { "name": "platform", "namespace": "argocd" },
            "spec": {
                "description": "Platform services",
                "source_repos": ["*"],
                "cluster_resource_whitelist": [{ "group": "*", "kind": "*" }]
            }
        }),
    );
    assert_eq!(project.spec.cluster_resource_whitelist[0].kind, "*");
}

#[test]
fn test_external_secret() {
    let secret: ExternalSecret = round_trip(
        "k8s_external_secrets_io_external_secret_v1beta1_manifest",
        json!({
            "metadata": { "name": "db", "namespace": "prod" },
            "spec": {
                "secret_store_ref": { "name": "vault", "kind": "ClusterSecretStore" },
                "refresh_interval": "1h",
                "data": [{ "secret_key": "password", "remote_ref": { "key": "db/prod" } }]
            }
        }),
    );
    assert_eq!(secret.spec.data[0].remote_ref.key, "db/prod");
}

#[test]
fn test_secret_store() {
    let store: SecretStore = round_trip(
        "k8s_external_secrets_io_secret_store_v1beta1_manifest",
        json!({
            "metadata": { "name": "vault", "namespace": "prod" },
            "spec": {
                "provider": { "vault": { "server": "https://vault:8200", "path": "secret" } }
            }
        }),
    );
    assert_eq!(store.spec.provider.as_value()["vault"]["path"], "secret");
}

#[test]
fn test_cluster_secret_store() {
    let store: ClusterSecretStore = round_trip(
        "k8s_external_secrets_io_cluster_secret_store_v1beta1_manifest",
        json!({
            "metadata": { "name": "vault" },
            "spec": {
                "provider": { "vault": { "server": "https://vault:8200" } },
                "refresh_interval": 60
            }
        }),
    );
    assert_eq!(store.spec.refresh_interval, Some(60));
}

#[test]
fn test_cluster_scoped_rejects_namespace() {
    let response = provider()
        .render(
            "k8s_cert_manager_io_cluster_issuer_v1_manifest",
            &json!({
                "metadata": { "name": "selfsigned", "namespace": "default" },
                "spec": { "self_signed": {} }
            }),
        )
        .unwrap();

    assert!(response.yaml.is_none());
    let diagnostic = response.diagnostics.errors().next().unwrap();
    assert_eq!(diagnostic.summary, "Unsupported argument");
    assert_eq!(
        diagnostic.attribute.as_ref().unwrap().to_string(),
        "metadata.namespace"
    );
}

#[test]
fn test_invalid_base64_is_reported() {
    let response = provider()
        .render(
            "k8s_cert_manager_io_issuer_v1_manifest",
            &json!({
                "metadata": { "name": "vault", "namespace": "prod" },
                "spec": {
                    "vault": {
                        "server": "https://vault:8200",
                        "path": "pki/sign/web",
                        "ca_bundle": "not base64!",
                        "auth": { "kubernetes": { "role": "issuer" } }
                    }
                }
            }),
        )
        .unwrap();

    assert!(response.diagnostics.has_error());
    let diagnostic = response.diagnostics.errors().next().unwrap();
    assert_eq!(diagnostic.summary, "Invalid attribute value");
    assert_eq!(
        diagnostic.attribute.as_ref().unwrap().to_string(),
        "spec.vault.ca_bundle"
    );
}

#[test]
fn test_negative_sample_limit_is_reported_at_its_path() {
    let provider = provider();
    let type_name = "k8s_monitoring_coreos_com_service_monitor_v1_manifest";
    let config = json!({
        "metadata": { "name": "api", "namespace": "monitoring" },
        "spec": { "selector": {}, "sample_limit": -1 }
    });

    let diagnostics = provider.resource(type_name).unwrap().validate_config(&config);
    let diagnostic = diagnostics.errors().next().unwrap();
    assert_eq!(diagnostic.summary, "Invalid attribute value");
    assert_eq!(
        diagnostic.attribute.as_ref().unwrap().to_string(),
        "spec.sample_limit"
    );

    let response = provider.apply(&MemoryStateStore::new(), type_name, "api", &config).unwrap();
    assert!(response.state.is_none());
    assert!(response
        .diagnostics
        .iter()
        .all(|d| d.summary != "Unable to marshal YAML"));
}

#[test]
fn test_computed_id_cannot_be_configured() {
    let response = provider()
        .render(
            "k8s_cert_manager_io_cluster_issuer_v1_manifest",
            &json!({
                "id": "42",
                "metadata": { "name": "selfsigned" },
                "spec": { "self_signed": {} }
            }),
        )
        .unwrap();

    assert!(response.yaml.is_none());
    let diagnostic = response.diagnostics.errors().next().unwrap();
    assert_eq!(diagnostic.summary, "Invalid configuration: computed attribute");
    assert_eq!(diagnostic.attribute.as_ref().unwrap().to_string(), "id");
}

#[test]
fn test_file_state_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("manifests.json");
    let provider = provider();
    let type_name = "k8s_argoproj_io_app_project_v1alpha1_manifest";
    let config = json!({
        "metadata": { "name": "platform", "namespace": "argocd" },
        "spec": { "source_repos": ["*"] }
    });

    let created = provider
        .apply(&FileStateStore::new(&path), type_name, "platform", &config)
        .unwrap()
        .state
        .unwrap();

    let reopened = FileStateStore::new(&path);
    let address = address(type_name, "platform").unwrap();
    assert_eq!(reopened.get(&address).unwrap(), Some(created.clone()));

    let refreshed = provider.refresh(&reopened, &address).unwrap();
    assert_eq!(refreshed.state, Some(created));

    provider.destroy(&reopened, &address).unwrap();
    assert!(FileStateStore::new(&path).list().unwrap().is_empty());
}

#[test]
fn test_apply_refuses_address_of_other_type() {
    let provider = provider();
    let store = MemoryStateStore::new();
    let certificate = "k8s_cert_manager_io_certificate_v1_manifest";
    let issuer = "k8s_cert_manager_io_issuer_v1_manifest";

    let issuer_state = provider
        .apply(
            &store,
            issuer,
            "web",
            &json!({
                "metadata": { "name": "web", "namespace": "prod" },
                "spec": { "self_signed": {} }
            }),
        )
        .unwrap()
        .state
        .unwrap();

    // An issuer recorded under a certificate address
    store
        .put(&address(certificate, "web").unwrap(), issuer_state)
        .unwrap();

    let err = provider
        .apply(
            &store,
            certificate,
            "web",
            &json!({
                "metadata": { "name": "web", "namespace": "prod" },
                "spec": { "secret_name": "web", "issuer_ref": { "name": "web" } }
            }),
        )
        .unwrap_err();
    assert!(matches!(err, ProviderError::TypeMismatch { .. }));
}
