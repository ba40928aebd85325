//! Issuer and ClusterIssuer Custom Resource Definitions
//!
//! Both kinds share the same issuer configuration; ClusterIssuers are cluster
//! scoped and can be referenced from any namespace.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::{Base64String, DynamicValue};

use crate::references::SecretKeySelector;

/// IssuerSpec defines the desired state of an Issuer
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "cert-manager.io",
    version = "v1",
    kind = "Issuer",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct IssuerSpec {
    /// ACME issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acme: Option<AcmeIssuer>,

    /// CA issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<CaIssuer>,

    /// Self-signed issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_signed: Option<SelfSignedIssuer>,

    /// Vault issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultIssuer>,
}

/// ClusterIssuerSpec defines the desired state of a ClusterIssuer
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "cert-manager.io",
    version = "v1",
    kind = "ClusterIssuer"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIssuerSpec {
    /// ACME issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acme: Option<AcmeIssuer>,

    /// CA issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<CaIssuer>,

    /// Self-signed issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_signed: Option<SelfSignedIssuer>,

    /// Vault issuer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultIssuer>,
}

/// ACME (e.g. Let's Encrypt) issuer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcmeIssuer {
    /// ACME directory URL
    pub server: String,

    /// Email address registered with the ACME account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Secret holding the ACME account private key
    pub private_key_secret_ref: SecretKeySelector,

    /// Disable TLS verification of the ACME server
    #[serde(default, rename = "skipTLSVerify", skip_serializing_if = "Option::is_none")]
    pub skip_tls_verify: Option<bool>,

    /// Preferred certificate chain by issuer common name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_chain: Option<String>,

    /// PEM CA bundle used to validate the ACME server, base64 encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<Base64String>,

    /// Challenge solvers, the most specific selector wins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solvers: Vec<AcmeChallengeSolver>,
}

/// ACME challenge solver
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcmeChallengeSolver {
    /// Which certificates this solver applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<CertificateDnsNameSelector>,

    /// HTTP-01 challenge configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http01: Option<AcmeHttp01Solver>,

    /// DNS-01 challenge configuration, provider specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns01: Option<DynamicValue>,
}

/// Selects certificates by DNS name, zone or label
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDnsNameSelector {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_names: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_zones: Vec<String>,

    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub match_labels: std::collections::BTreeMap<String, String>,
}

/// HTTP-01 solver
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcmeHttp01Solver {
    /// Solve through an Ingress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<AcmeHttp01Ingress>,
}

/// Ingress used to answer HTTP-01 challenges
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcmeHttp01Ingress {
    /// Legacy ingress class annotation value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// IngressClass resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,

    /// Existing Ingress to edit instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Service type of the solver, ClusterIP or NodePort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

/// Signs certificates with a CA key pair stored in a Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaIssuer {
    /// Secret holding `tls.crt` and `tls.key`
    pub secret_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crl_distribution_points: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ocsp_servers: Vec<String>,
}

/// Self-signs certificates with their own private key
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelfSignedIssuer {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crl_distribution_points: Vec<String>,
}

/// HashiCorp Vault PKI issuer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaultIssuer {
    /// Vault server address
    pub server: String,

    /// Mount path of the PKI signing role
    pub path: String,

    /// Vault Enterprise namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// PEM CA bundle used to validate the Vault server, base64 encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<Base64String>,

    /// Authentication method configuration
    pub auth: DynamicValue,
}
