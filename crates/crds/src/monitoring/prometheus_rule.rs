//! PrometheusRule Custom Resource Definition
//!
//! Recording and alerting rules loaded by Prometheus or Thanos Ruler.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utilities::IntOrString;

/// PrometheusRuleSpec defines the desired state of a PrometheusRule
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "monitoring.coreos.com",
    version = "v1",
    kind = "PrometheusRule",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusRuleSpec {
    /// Rule groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<RuleGroup>,
}

/// A group of rules evaluated together
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    /// Group name, unique within the PrometheusRule
    pub name: String,

    /// Evaluation interval, e.g. "1m"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Maximum number of alerts or series a rule may produce, 0 for no limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    /// Rules in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
}

/// A recording or alerting rule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Name of the time series to record; mutually exclusive with `alert`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    /// Name of the alert; mutually exclusive with `record`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,

    /// PromQL expression to evaluate
    pub expr: IntOrString,

    /// How long the condition must hold before the alert fires
    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,

    /// How long the alert keeps firing after the condition clears
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_firing_for: Option<String>,

    /// Labels added or overwritten
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations added to alerts
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}
