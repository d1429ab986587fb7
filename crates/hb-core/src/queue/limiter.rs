use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use hb_model::BackoffStrategy;

/// Decides how long an item waits before it is re-queued.
pub trait RateLimiter<K>: Send + Sync + 'static {
    /// Delay for the next retry of `key`; records one more failure.
    fn when(&self, key: &K) -> Duration;
    /// Drop all failure history of `key`.
    fn forget(&self, key: &K);
    /// Number of failures recorded for `key`.
    fn num_requeues(&self, key: &K) -> u32;
}

/// Per-item exponential limiter driven by a [`BackoffStrategy`].
///
/// Each key keeps its own failure counter, so one noisy item never slows down another.
pub struct ItemExponentialLimiter<K> {
    backoff: BackoffStrategy,
    failures: Mutex<HashMap<K, u32>>,
}

impl<K> ItemExponentialLimiter<K> {
    pub fn new(backoff: BackoffStrategy) -> Self {
        Self {
            backoff,
            failures: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> RateLimiter<K> for ItemExponentialLimiter<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn when(&self, key: &K) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let count = failures.entry(key.clone()).or_insert(0);
        let delay = self.backoff.delay(*count);
        *count = count.saturating_add(1);
        delay
    }

    fn forget(&self, key: &K) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn num_requeues(&self, key: &K) -> u32 {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}
