//! Deduplicating, rate-limited work queue.
//!
//! Semantics follow the classic controller work queue:
//! - a key is held at most once while waiting (`dirty`);
//! - a key handed out by [`WorkQueue::get`] is `processing` until [`WorkQueue::done`];
//! - adding a key that is being processed marks it dirty, and `done` puts it back.
//!
//! This guarantees that one key is never reconciled concurrently.
mod limiter;
pub use limiter::{ItemExponentialLimiter, RateLimiter};

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

struct State<K> {
    queue: VecDeque<K>,
    dirty: HashSet<K>,
    processing: HashSet<K>,
    shutting_down: bool,
}

struct Shared<K> {
    state: Mutex<State<K>>,
    notify: Notify,
    limiter: Box<dyn RateLimiter<K>>,
}

/// Cloneable handle to a shared work queue.
pub struct WorkQueue<K> {
    shared: Arc<Shared<K>>,
}

impl<K> Clone for WorkQueue<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K> WorkQueue<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    pub fn new(limiter: impl RateLimiter<K>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    queue: VecDeque::new(),
                    dirty: HashSet::new(),
                    processing: HashSet::new(),
                    shutting_down: false,
                }),
                notify: Notify::new(),
                limiter: Box::new(limiter),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<K>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `key` as needing processing. No-op while it is already waiting.
    pub fn add(&self, key: K) {
        let mut st = self.lock();
        if st.shutting_down || st.dirty.contains(&key) {
            return;
        }
        st.dirty.insert(key.clone());
        if st.processing.contains(&key) {
            return;
        }
        st.queue.push_back(key);
        drop(st);
        self.shared.notify.notify_one();
    }

    /// Wait for the next key.
    ///
    /// Returns `None` once the queue is shut down and every waiting key has been handed out.
    pub async fn get(&self) -> Option<K> {
        loop {
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut st = self.lock();
                if let Some(key) = st.queue.pop_front() {
                    st.dirty.remove(&key);
                    st.processing.insert(key.clone());
                    return Some(key);
                }
                if st.shutting_down {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Release `key` after processing. A key re-added meanwhile becomes available again.
    pub fn done(&self, key: &K) {
        let mut st = self.lock();
        st.processing.remove(key);
        if st.dirty.contains(key) {
            st.queue.push_back(key.clone());
            drop(st);
            self.shared.notify.notify_one();
        }
    }

    /// Add `key` after `delay` has elapsed.
    pub fn add_after(&self, key: K, delay: Duration) {
        if self.is_shutting_down() {
            return;
        }
        if delay.is_zero() {
            self.add(key);
            return;
        }
        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.add(key);
        });
    }

    /// Add `key` after the limiter's delay for it, counting one more retry.
    pub fn add_rate_limited(&self, key: K) {
        let delay = self.shared.limiter.when(&key);
        self.add_after(key, delay);
    }

    /// Stop tracking retries of `key`.
    pub fn forget(&self, key: &K) {
        self.shared.limiter.forget(key);
    }

    pub fn num_requeues(&self, key: &K) -> u32 {
        self.shared.limiter.num_requeues(key)
    }

    /// Number of keys waiting to be handed out.
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_shutting_down(&self) -> bool {
        self.lock().shutting_down
    }

    /// Refuse new keys and wake every blocked [`WorkQueue::get`].
    pub fn shutdown(&self) {
        self.lock().shutting_down = true;
        self.shared.notify.notify_waiters();
    }
}
