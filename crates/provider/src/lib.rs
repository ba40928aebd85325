//! Kubernetes CRD manifest resources
//!
//! Exposes Custom Resource Definitions as declarative manifest resources.
//! Each resource type validates user configuration against a schema derived
//! from the CRD's OpenAPI definition, stamps `apiVersion`/`kind`, renders the
//! object as YAML and records the YAML plus a timestamp id in state.
//!
//! Nothing here talks to a cluster: read is a no-op, delete only forgets.
//!
//! # Example
//!
//! ```no_run
//! use k8s_manifest_provider::{MemoryStateStore, Provider};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Provider::new("k8s")?;
//! let store = MemoryStateStore::new();
//!
//! let config = json!({
//!     "metadata": { "name": "web", "namespace": "default" },
//!     "spec": {
//!         "secret_name": "web-tls",
//!         "dns_names": ["web.example.com"],
//!         "issuer_ref": { "name": "letsencrypt", "kind": "ClusterIssuer" }
//!     }
//! });
//! let response = provider.apply(&store, "k8s_cert_manager_io_certificate_v1_manifest", "web", &config)?;
//! if let Some(state) = response.state {
//!     println!("{}", state.yaml);
//! }
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod error;
pub mod manifest;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod state;

pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, PathStep, Severity};
pub use error::ProviderError;
pub use manifest::ManifestResource;
pub use provider::{address, Provider, DEFAULT_PROVIDER_TYPE_NAME};
pub use resource::{LifecycleResponse, RenderResponse, ResourceType};
pub use schema::{Attribute, AttributeKind, ElementType, Presence, Schema};
pub use state::{FileStateStore, MemoryStateStore, ResourceState, StateError, StateStore};
