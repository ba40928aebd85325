//! In-memory state store

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ResourceState, StateError, StateStore};

/// State store backed by a shared in-memory map.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    resources: Arc<Mutex<BTreeMap<String, ResourceState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, ResourceState>>, StateError> {
        self.resources.lock().map_err(|_| StateError::Poisoned)
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, address: &str) -> Result<Option<ResourceState>, StateError> {
        Ok(self.lock()?.get(address).cloned())
    }

    fn put(&self, address: &str, state: ResourceState) -> Result<(), StateError> {
        self.lock()?.insert(address.to_string(), state);
        Ok(())
    }

    fn remove(&self, address: &str) -> Result<Option<ResourceState>, StateError> {
        Ok(self.lock()?.remove(address))
    }

    fn list(&self) -> Result<Vec<(String, ResourceState)>, StateError> {
        Ok(self
            .lock()?
            .iter()
            .map(|(address, state)| (address.clone(), state.clone()))
            .collect())
    }
}
