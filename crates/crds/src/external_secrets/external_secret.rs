//! ExternalSecret Custom Resource Definition
//!
//! Fetches values from an external secret manager into a Kubernetes Secret.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::DynamicValue;

/// ExternalSecretSpec defines the desired state of an ExternalSecret
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "external-secrets.io",
    version = "v1beta1",
    kind = "ExternalSecret",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretSpec {
    /// Store the values are fetched from
    pub secret_store_ref: SecretStoreRef,

    /// Secret the values are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ExternalSecretTarget>,

    /// How often values are re-fetched, e.g. "1h"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,

    /// Individual keys to fetch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<ExternalSecretData>,

    /// Whole remote objects to fetch, provider specific
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_from: Vec<DynamicValue>,
}

/// Reference to a SecretStore or ClusterSecretStore
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretStoreRef {
    /// Name of the store
    pub name: String,

    /// SecretStore or ClusterSecretStore, SecretStore when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Target Secret settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretTarget {
    /// Secret name, the ExternalSecret name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ownership of the target Secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_policy: Option<CreationPolicy>,

    /// What happens to the Secret when the remote value disappears
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,

    /// Template for the Secret contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<DynamicValue>,

    /// Make the Secret immutable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable: Option<bool>,
}

/// Ownership of the target Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum CreationPolicy {
    Owner,
    Orphan,
    Merge,
    None,
}

/// Behaviour when the remote value is deleted
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum DeletionPolicy {
    Delete,
    Merge,
    Retain,
}

/// Maps one remote value to one Secret key
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretData {
    /// Key in the target Secret
    pub secret_key: String,

    /// Remote value location
    pub remote_ref: ExternalSecretDataRemoteRef,
}

/// Location of a value in the external store
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretDataRemoteRef {
    /// Remote key
    pub key: String,

    /// Property within a structured remote value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,

    /// Remote value version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
