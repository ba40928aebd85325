//! Provider errors
//!
//! Configuration problems are reported as [`Diagnostics`](crate::Diagnostics);
//! these errors cover everything that stops an operation from running at all.

use thiserror::Error;

use crate::state::StateError;

/// Errors that can occur in provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No resource type registered under this name
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// The CRD's OpenAPI schema could not be turned into a resource schema
    #[error("Invalid CRD schema for {kind}: {reason}")]
    InvalidSchema {
        /// CRD kind
        kind: String,
        /// What was wrong
        reason: String,
    },

    /// Provider type name is not a valid identifier
    #[error("Invalid provider type name {0:?}: must start with a letter or underscore and contain only letters, digits, '_' and '-'")]
    InvalidTypeName(String),

    /// Resource address is malformed
    #[error("Invalid resource address: {0}")]
    InvalidAddress(String),

    /// Address is not present in state
    #[error("Resource not found in state: {0}")]
    NotInState(String),

    /// Address is already tracked under a different resource type
    #[error("Resource {address} is a {actual}, not a {expected}")]
    TypeMismatch {
        /// Resource address
        address: String,
        /// Type recorded in state
        actual: String,
        /// Type requested
        expected: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// State storage error
    #[error("State error: {0}")]
    State(#[from] StateError),
}
