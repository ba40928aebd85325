//! Prometheus Operator CRDs (`monitoring.coreos.com/v1`)
//!
//! - ServiceMonitors (scrape Services by label)
//! - PodMonitors (scrape Pods by label)
//! - PrometheusRules (recording and alerting rules)

pub mod pod_monitor;
pub mod prometheus_rule;
pub mod relabel;
pub mod service_monitor;

pub use pod_monitor::*;
pub use prometheus_rule::*;
pub use relabel::*;
pub use service_monitor::*;
