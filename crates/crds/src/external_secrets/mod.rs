//! External Secrets Operator CRDs (`external-secrets.io/v1beta1`)
//!
//! - ExternalSecrets (what to fetch and the Secret to write)
//! - SecretStores (namespaced provider configuration)
//! - ClusterSecretStores (cluster-wide provider configuration)

pub mod external_secret;
pub mod secret_store;

pub use external_secret::*;
pub use secret_store::*;
