//! PodMonitor Custom Resource Definition
//!
//! Declares how a set of Pods is scraped by Prometheus.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::IntOrString;

use super::relabel::{RelabelConfig, Scheme};
use crate::references::{LabelSelector, NamespaceSelector};

/// PodMonitorSpec defines the desired state of a PodMonitor
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "monitoring.coreos.com",
    version = "v1",
    kind = "PodMonitor",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct PodMonitorSpec {
    /// Pod label whose value becomes the `job` label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_label: Option<String>,

    /// Pod labels transferred onto the scraped metrics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pod_target_labels: Vec<String>,

    /// Scrape endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pod_metrics_endpoints: Vec<PodMetricsEndpoint>,

    /// Label selector for the Pods to scrape
    pub selector: LabelSelector,

    /// Namespaces the Pods are discovered in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<NamespaceSelector>,

    /// Per-scrape limit on the number of accepted samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<u64>,
}

/// A scrapeable Pod endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodMetricsEndpoint {
    /// Name of the Pod port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Name or number of the container port, prefer `port`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<IntOrString>,

    /// HTTP path to scrape, "/metrics" when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// HTTP scheme to scrape with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,

    /// Scrape interval, e.g. "30s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Scrape timeout, must not exceed the interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_timeout: Option<String>,

    /// Keep labels from the scraped data on conflict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_labels: Option<bool>,

    /// Relabelings applied to samples before ingestion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_relabelings: Vec<RelabelConfig>,

    /// Relabelings applied to targets before scraping
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relabelings: Vec<RelabelConfig>,
}
