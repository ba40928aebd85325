//! Resource type abstraction
//!
//! This trait is the seam between the provider's workflows and the concrete
//! resource implementations. [`ManifestResource`](crate::ManifestResource)
//! implements it for every CRD; tests can supply their own.

use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;
use crate::state::ResourceState;

/// Outcome of a lifecycle operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleResponse {
    /// New state; `None` when the operation failed
    pub state: Option<ResourceState>,
    pub diagnostics: Diagnostics,
}

impl LifecycleResponse {
    pub fn success(state: ResourceState, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(state),
            diagnostics,
        }
    }

    pub fn failure(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }
}

/// Outcome of rendering without touching state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderResponse {
    /// Rendered manifest; `None` when the configuration was rejected
    pub yaml: Option<String>,
    pub diagnostics: Diagnostics,
}

/// A resource type exposed by the provider
pub trait ResourceType: Send + Sync {
    /// Full type name, e.g. `k8s_cert_manager_io_certificate_v1_manifest`
    fn type_name(&self) -> &str;

    /// `apiVersion` stamped onto rendered manifests
    fn api_version(&self) -> &str;

    /// `kind` stamped onto rendered manifests
    fn kind(&self) -> &str;

    /// Configuration schema
    fn schema(&self) -> &Schema;

    /// Check configuration without rendering
    fn validate_config(&self, config: &Value) -> Diagnostics {
        self.schema().validate(config)
    }

    /// Validate and render configuration
    fn render(&self, config: &Value) -> RenderResponse;

    /// Render configuration into new state with a fresh id
    fn create(&self, config: &Value) -> LifecycleResponse;

    /// Refresh state. Manifests have no remote counterpart, so state is returned as is.
    fn read(&self, state: ResourceState) -> LifecycleResponse;

    /// Re-render configuration into state, keeping the prior id
    fn update(&self, prior: &ResourceState, config: &Value) -> LifecycleResponse;

    /// Forget the resource. Nothing exists outside state, so only diagnostics are returned.
    fn delete(&self, state: &ResourceState) -> Diagnostics;
}
