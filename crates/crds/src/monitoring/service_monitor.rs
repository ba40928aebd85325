//! ServiceMonitor Custom Resource Definition
//!
//! Declares how a set of Services is scraped by Prometheus.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::IntOrString;

use super::relabel::{RelabelConfig, Scheme};
use crate::references::{LabelSelector, NamespaceSelector, SecretKeySelector};

/// ServiceMonitorSpec defines the desired state of a ServiceMonitor
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "monitoring.coreos.com",
    version = "v1",
    kind = "ServiceMonitor",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMonitorSpec {
    /// Service label whose value becomes the `job` label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_label: Option<String>,

    /// Service labels transferred onto the scraped metrics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_labels: Vec<String>,

    /// Pod labels transferred onto the scraped metrics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pod_target_labels: Vec<String>,

    /// Scrape endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,

    /// Label selector for the Services to scrape
    pub selector: LabelSelector,

    /// Namespaces the Services are discovered in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<NamespaceSelector>,

    /// Per-scrape limit on the number of accepted samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<u64>,
}

/// A scrapeable Service endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Name of the Service port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Name or number of the target port of the Pod behind the Service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<IntOrString>,

    /// HTTP path to scrape, "/metrics" when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// HTTP scheme to scrape with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,

    /// Optional HTTP URL parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Vec<String>>,

    /// Scrape interval, e.g. "30s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Scrape timeout, must not exceed the interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_timeout: Option<String>,

    /// Keep labels from the scraped data on conflict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_labels: Option<bool>,

    /// Use the timestamps present in the scraped data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_timestamps: Option<bool>,

    /// Secret key holding a bearer token for scraping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_secret: Option<SecretKeySelector>,

    /// Relabelings applied to samples before ingestion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_relabelings: Vec<RelabelConfig>,

    /// Relabelings applied to targets before scraping
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relabelings: Vec<RelabelConfig>,
}
