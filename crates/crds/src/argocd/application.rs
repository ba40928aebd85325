//! Application Custom Resource Definition
//!
//! An Argo CD Application deploys manifests from a source repository into a
//! destination cluster and namespace.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::DynamicValue;

/// ApplicationSpec defines the desired state of an Application
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "argoproj.io",
    version = "v1alpha1",
    kind = "Application",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    /// AppProject the Application belongs to, "default" for the default project
    pub project: String,

    /// Where the manifests come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ApplicationSource>,

    /// Where the manifests are deployed
    pub destination: ApplicationDestination,

    /// When and how to sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_policy: Option<SyncPolicy>,

    /// Fields excluded from drift detection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_differences: Vec<ResourceIgnoreDifferences>,

    /// Number of sync history entries kept, 10 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_history_limit: Option<i64>,
}

/// Repository source of an Application
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSource {
    /// Git or Helm repository URL
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    /// Directory within a Git repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Branch, tag, commit or Helm chart version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_revision: Option<String>,

    /// Helm chart name, for Helm repositories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,

    /// Helm options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<ApplicationSourceHelm>,

    /// Kustomize options, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kustomize: Option<DynamicValue>,
}

/// Helm rendering options
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSourceHelm {
    /// Release name, the Application name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,

    /// Values files relative to the source path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_files: Vec<String>,

    /// Inline values as a YAML string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,

    /// Individual `--set` parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<HelmParameter>,

    /// Skip installing CRDs shipped with the chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_crds: Option<bool>,
}

/// Helm `--set` parameter
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HelmParameter {
    pub name: String,

    pub value: String,

    /// Use `--set-string` instead of `--set`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_string: Option<bool>,
}

/// Target cluster and namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDestination {
    /// API server URL of the target cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Registered cluster name, alternative to `server`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Target namespace for namespaced resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Sync behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    /// Sync automatically when the source changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automated: Option<SyncPolicyAutomated>,

    /// Sync options such as "CreateNamespace=true"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sync_options: Vec<String>,

    /// Retry behaviour of failed syncs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryStrategy>,
}

/// Automated sync options
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicyAutomated {
    /// Delete resources no longer in the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,

    /// Revert changes made in the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_heal: Option<bool>,

    /// Allow syncing a source that renders no resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_empty: Option<bool>,
}

/// Retry strategy for failed syncs
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetryStrategy {
    /// Maximum attempts, negative for unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<Backoff>,
}

/// Exponential backoff between sync retries
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Backoff {
    /// Initial delay, e.g. "5s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Multiplier applied after each failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<i64>,

    /// Upper bound on the delay, e.g. "3m"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
}

/// Resource fields ignored during diffing
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIgnoreDifferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// RFC 6901 JSON pointers to ignore
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_pointers: Vec<String>,

    /// JQ path expressions to ignore
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jq_path_expressions: Vec<String>,
}
