//! Resource state
//!
//! State records what was rendered for each resource address. It is the only
//! thing persisted between operations; there is no cluster to compare against.
//!
//! Backends:
//! - `file.rs` - JSON state file on disk
//! - `memory.rs` - in-memory map, for tests and embedding

mod file;
mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Stored state of one manifest resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type name, e.g. `k8s_cert_manager_io_certificate_v1_manifest`
    pub type_name: String,

    /// Nanosecond timestamp assigned on create
    pub id: String,

    /// Rendered manifest
    pub yaml: String,

    /// Configuration the manifest was rendered from
    pub attributes: Value,
}

/// Errors from state backends
#[derive(Debug, Error)]
pub enum StateError {
    /// Reading or writing the state file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State file is not valid JSON or has the wrong shape
    #[error("Corrupt state: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// State file was written by an incompatible version
    #[error("Unsupported state version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Version this build understands
        expected: u32,
    },

    /// In-memory store lock was poisoned by a panicking writer
    #[error("State lock poisoned")]
    Poisoned,
}

/// Storage backend for resource state, keyed by resource address
pub trait StateStore: Send + Sync {
    /// State stored at `address`, if any
    fn get(&self, address: &str) -> Result<Option<ResourceState>, StateError>;

    /// Store (or replace) the state at `address`
    fn put(&self, address: &str, state: ResourceState) -> Result<(), StateError>;

    /// Remove the state at `address`, returning what was stored
    fn remove(&self, address: &str) -> Result<Option<ResourceState>, StateError>;

    /// All stored states, ordered by address
    fn list(&self) -> Result<Vec<(String, ResourceState)>, StateError>;
}
