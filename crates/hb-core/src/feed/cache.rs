use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use hb_model::{WorkloadKey, WorkloadSnapshot};

/// Local, eventually-consistent view of the watched workloads.
///
/// Written only by the feed; readers receive owned copies.
#[derive(Clone, Default)]
pub struct WorkloadCache {
    inner: Arc<RwLock<HashMap<WorkloadKey, WorkloadSnapshot>>>,
}

impl WorkloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &WorkloadKey) -> Option<WorkloadSnapshot> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Insert or replace a snapshot, returning its key.
    pub fn apply(&self, snapshot: WorkloadSnapshot) -> WorkloadKey {
        let key = snapshot.key();
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), snapshot);
        key
    }

    pub fn remove(&self, key: &WorkloadKey) -> Option<WorkloadSnapshot> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Swap the whole content for a fresh list.
    ///
    /// Returns every key that was present before or after, so vanished entries get re-checked too.
    pub fn replace(&self, items: Vec<WorkloadSnapshot>) -> Vec<WorkloadKey> {
        let fresh: HashMap<_, _> = items.into_iter().map(|s| (s.key(), s)).collect();
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut keys: Vec<WorkloadKey> = fresh.keys().cloned().collect();
        keys.extend(guard.keys().filter(|k| !fresh.contains_key(*k)).cloned());
        keys.sort();

        *guard = fresh;
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
