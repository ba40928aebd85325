//! cert-manager CRDs (`cert-manager.io/v1`)
//!
//! - Certificates
//! - Issuers (namespaced)
//! - ClusterIssuers

pub mod certificate;
pub mod issuer;

pub use certificate::*;
pub use issuer::*;
