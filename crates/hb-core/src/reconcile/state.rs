use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use hb_model::WorkloadKey;

use crate::shutdown::SupervisionResult;
use crate::tail::{LineSink, TailSession};

#[derive(Default)]
struct TailSlot {
    session: Option<Arc<TailSession>>,
    closed: bool,
}

/// State shared by the reconciler worker and the shutdown path.
#[derive(Default)]
pub struct ReconcilerState {
    workload: Mutex<Option<WorkloadKey>>,
    tail: Mutex<TailSlot>,
    pub(crate) cleanup: OnceCell<SupervisionResult>,
}

impl ReconcilerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose workload reference is known up front.
    pub fn with_workload(key: WorkloadKey) -> Self {
        Self {
            workload: Mutex::new(Some(key)),
            ..Self::default()
        }
    }

    pub fn workload(&self) -> Option<WorkloadKey> {
        self.workload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record `key` as the supervised workload if none is set yet.
    ///
    /// Returns `true` when this call set it.
    pub fn resolve_workload(&self, key: &WorkloadKey) -> bool {
        let mut guard = self.workload.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            return false;
        }
        *guard = Some(key.clone());
        true
    }

    fn tail_slot(&self) -> MutexGuard<'_, TailSlot> {
        self.tail.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The tail session for `key`, created on first use.
    ///
    /// Returns `None` once the tail has been shut for good.
    pub fn tail_for(&self, key: &WorkloadKey, sink: &Arc<dyn LineSink>) -> Option<Arc<TailSession>> {
        let mut slot = self.tail_slot();
        if slot.closed {
            return None;
        }
        let session = slot
            .session
            .get_or_insert_with(|| Arc::new(TailSession::new(key.clone(), Arc::clone(sink))));
        Some(Arc::clone(session))
    }

    /// Close the active session, if any, and refuse new ones.
    pub fn close_tail(&self) -> Option<Arc<TailSession>> {
        let mut slot = self.tail_slot();
        slot.closed = true;
        let session = slot.session.clone();
        drop(slot);

        if let Some(s) = &session {
            s.close();
        }
        session
    }

    /// Result of the cleanup, once it has completed.
    pub fn cleanup_result(&self) -> Option<&SupervisionResult> {
        self.cleanup.get()
    }
}
