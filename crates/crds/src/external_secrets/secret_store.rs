//! SecretStore and ClusterSecretStore Custom Resource Definitions

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::DynamicValue;

/// SecretStoreSpec defines the desired state of a SecretStore
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "external-secrets.io",
    version = "v1beta1",
    kind = "SecretStore",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SecretStoreSpec {
    /// Provider configuration (aws, vault, gcpsm, ...)
    pub provider: DynamicValue,

    /// Store-level refresh interval in seconds, 0 disables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<i64>,

    /// Retry behaviour of provider calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_settings: Option<SecretStoreRetrySettings>,

    /// Controller class that handles this store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
}

/// ClusterSecretStoreSpec defines the desired state of a ClusterSecretStore
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "external-secrets.io",
    version = "v1beta1",
    kind = "ClusterSecretStore"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSecretStoreSpec {
    /// Provider configuration (aws, vault, gcpsm, ...)
    pub provider: DynamicValue,

    /// Store-level refresh interval in seconds, 0 disables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<i64>,

    /// Retry behaviour of provider calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_settings: Option<SecretStoreRetrySettings>,

    /// Controller class that handles this store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// Namespaces allowed to use this store
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ClusterSecretStoreCondition>,
}

/// Retry settings for provider calls
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretStoreRetrySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i32>,

    /// Delay between retries, e.g. "10s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<String>,
}

/// Restricts which namespaces may reference a ClusterSecretStore
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSecretStoreCondition {
    /// Explicit namespace names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    /// Namespace name regular expressions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespace_regexes: Vec<String>,
}
