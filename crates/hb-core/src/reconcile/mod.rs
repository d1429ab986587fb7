//! Phase state machine driven by the work queue.
mod state;
pub use state::ReconcilerState;

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use hb_model::{Phase, WorkloadKey};

use crate::client::ClusterClient;
use crate::feed::WorkloadCache;
use crate::metrics::{MetricsHandle, ReconcileOutcome};
use crate::queue::WorkQueue;
use crate::shutdown::{Cleanup, SupervisionResult, Trigger};
use crate::tail::{LineSink, TailStart};

/// Decision taken for one observation of the workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    /// Nothing more to do until the next change.
    Resolved,
    /// Try again later, subject to the retry ceiling.
    Retry,
    /// Supervision is over; run cleanup with this trigger.
    Terminal(Trigger),
}

impl Reconcile {
    fn outcome(&self) -> ReconcileOutcome {
        match self {
            Reconcile::Resolved => ReconcileOutcome::Resolved,
            Reconcile::Retry => ReconcileOutcome::Retry,
            Reconcile::Terminal(_) => ReconcileOutcome::Terminal,
        }
    }
}

/// The single worker allowed to act on the workload.
pub struct Reconciler {
    client: Arc<dyn ClusterClient>,
    cache: WorkloadCache,
    queue: WorkQueue<WorkloadKey>,
    state: Arc<ReconcilerState>,
    cleanup: Cleanup,
    sink: Arc<dyn LineSink>,
    metrics: MetricsHandle,
    max_retries: u32,
}

impl Reconciler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Arc<dyn ClusterClient>,
        cache: WorkloadCache,
        queue: WorkQueue<WorkloadKey>,
        state: Arc<ReconcilerState>,
        cleanup: Cleanup,
        sink: Arc<dyn LineSink>,
        metrics: MetricsHandle,
        max_retries: u32,
    ) -> Self {
        Self {
            client,
            cache,
            queue,
            state,
            cleanup,
            sink,
            metrics,
            max_retries,
        }
    }

    /// Process keys until a terminal phase is reached or the queue shuts down.
    ///
    /// Returns the cleanup result in the first case and `None` in the second.
    #[instrument(name = "reconciler", skip_all)]
    pub async fn run(self) -> Option<SupervisionResult> {
        while let Some(key) = self.queue.get().await {
            match self.reconcile(&key).await {
                Reconcile::Resolved => self.queue.forget(&key),
                Reconcile::Retry => self.requeue(&key),
                Reconcile::Terminal(trigger) => {
                    self.queue.forget(&key);
                    self.queue.done(&key);
                    return Some(self.cleanup.run(trigger).await);
                }
            }
            self.queue.done(&key);
        }
        debug!("queue shut down");
        None
    }

    fn requeue(&self, key: &WorkloadKey) {
        let attempt = self.queue.num_requeues(key);
        if attempt < self.max_retries {
            debug!(workload = %key, attempt = attempt + 1, "requeueing");
            self.queue.add_rate_limited(key.clone());
            return;
        }
        warn!(workload = %key, attempts = attempt, "dropping workload out of the queue after too many retries");
        self.queue.forget(key);
        self.metrics.record_retry_dropped(key);
    }

    /// Decide what the latest snapshot of `key` requires.
    pub async fn reconcile(&self, key: &WorkloadKey) -> Reconcile {
        let Some(snapshot) = self.cache.get(key) else {
            debug!(workload = %key, "workload no longer cached");
            return Reconcile::Resolved;
        };
        if self.state.resolve_workload(key) {
            info!(workload = %key, "supervising workload");
        }

        let decision = match &snapshot.phase {
            Phase::Pending => match snapshot.startup_failure() {
                Some(container) => {
                    let reason = container.startup_failure().unwrap_or_default();
                    warn!(workload = %key, container = %container.name, reason, "container cannot start");
                    Reconcile::Terminal(Trigger::Failed {
                        reason: format!("container {} is waiting: {reason}", container.name),
                    })
                }
                None => {
                    debug!(workload = %key, "pending");
                    Reconcile::Resolved
                }
            },
            Phase::Running => self.ensure_tail(key).await,
            Phase::Succeeded => {
                info!(workload = %key, "workload succeeded");
                Reconcile::Terminal(Trigger::Succeeded)
            }
            Phase::Failed => {
                warn!(workload = %key, "workload failed");
                Reconcile::Terminal(Trigger::Failed {
                    reason: "workload phase is Failed".into(),
                })
            }
            Phase::Unknown | Phase::Other(_) => {
                warn!(workload = %key, phase = %snapshot.phase, "unexpected phase");
                Reconcile::Retry
            }
        };

        self.metrics
            .record_reconcile(&snapshot.phase, decision.outcome());
        decision
    }

    async fn ensure_tail(&self, key: &WorkloadKey) -> Reconcile {
        let Some(tail) = self.state.tail_for(key, &self.sink) else {
            return Reconcile::Resolved;
        };
        match tail.start(self.client.as_ref()).await {
            Ok(TailStart::Started) => {
                self.metrics.record_tail_started();
                Reconcile::Resolved
            }
            Ok(TailStart::AlreadyStarted | TailStart::Closed) => Reconcile::Resolved,
            Err(e) => {
                warn!(workload = %key, error = %e, "failed to open log stream");
                Reconcile::Retry
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::ItemExponentialLimiter;
    use crate::testing::{FakeCluster, LogScript, MemorySink, RecordingMetrics};
    use hb_model::{BackoffStrategy, ContainerStatus, WorkloadSnapshot};

    struct Harness {
        fake: Arc<FakeCluster>,
        cache: WorkloadCache,
        queue: WorkQueue<WorkloadKey>,
        state: Arc<ReconcilerState>,
        metrics: Arc<RecordingMetrics>,
        reconciler: Reconciler,
    }

    fn harness() -> Harness {
        let fake = FakeCluster::new();
        let cache = WorkloadCache::new();
        let queue = WorkQueue::new(ItemExponentialLimiter::new(BackoffStrategy::default()));
        let state = Arc::new(ReconcilerState::new());
        let metrics = Arc::new(RecordingMetrics::default());
        let cleanup = Cleanup::new(fake.clone(), state.clone(), metrics.clone());
        let reconciler = Reconciler::new(
            fake.clone(),
            cache.clone(),
            queue.clone(),
            state.clone(),
            cleanup,
            Arc::new(MemorySink::default()),
            metrics.clone(),
            5,
        );
        Harness {
            fake,
            cache,
            queue,
            state,
            metrics,
            reconciler,
        }
    }

    fn key() -> WorkloadKey {
        WorkloadKey::new("ns", "w")
    }

    fn pending(containers: Vec<ContainerStatus>) -> WorkloadSnapshot {
        WorkloadSnapshot::new("ns", "w", Phase::Pending).with_containers(containers)
    }

    #[tokio::test]
    async fn missing_workload_is_resolved() {
        let h = harness();
        assert_eq!(h.reconciler.reconcile(&key()).await, Reconcile::Resolved);
        assert!(h.state.workload().is_none());
    }

    #[tokio::test]
    async fn first_snapshot_resolves_reference() {
        let h = harness();
        h.cache.apply(pending(vec![]));

        h.reconciler.reconcile(&key()).await;
        assert_eq!(h.state.workload(), Some(key()));
    }

    #[tokio::test]
    async fn container_creating_is_not_a_failure() {
        let h = harness();
        h.cache.apply(pending(vec![ContainerStatus::waiting(
            "main",
            "ContainerCreating",
        )]));

        assert_eq!(h.reconciler.reconcile(&key()).await, Reconcile::Resolved);
        assert!(h.fake.deletes().is_empty());
    }

    #[tokio::test]
    async fn stuck_container_is_terminal() {
        let h = harness();
        h.cache.apply(pending(vec![
            ContainerStatus::ready("sidecar"),
            ContainerStatus::waiting("main", "ImagePullBackOff"),
        ]));

        match h.reconciler.reconcile(&key()).await {
            Reconcile::Terminal(Trigger::Failed { reason }) => {
                assert!(reason.contains("main"));
                assert!(reason.contains("ImagePullBackOff"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[tokio::test]
    async fn terminal_phases() {
        let h = harness();
        h.cache
            .apply(WorkloadSnapshot::new("ns", "w", Phase::Succeeded));
        assert_eq!(
            h.reconciler.reconcile(&key()).await,
            Reconcile::Terminal(Trigger::Succeeded)
        );

        h.cache.apply(WorkloadSnapshot::new("ns", "w", Phase::Failed));
        assert!(matches!(
            h.reconciler.reconcile(&key()).await,
            Reconcile::Terminal(Trigger::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn running_starts_one_tail() {
        let h = harness();
        h.cache.apply(WorkloadSnapshot::new("ns", "w", Phase::Running));

        for _ in 0..3 {
            assert_eq!(h.reconciler.reconcile(&key()).await, Reconcile::Resolved);
        }

        assert_eq!(h.fake.log_opens(), 1);
        assert_eq!(h.metrics.tails.load(std::sync::atomic::Ordering::SeqCst), 1);
        h.state.close_tail();
    }

    #[tokio::test]
    async fn log_open_failure_is_retried() {
        let h = harness();
        h.fake.script_logs(LogScript::Fail);
        h.cache.apply(WorkloadSnapshot::new("ns", "w", Phase::Running));

        assert_eq!(h.reconciler.reconcile(&key()).await, Reconcile::Retry);
        assert_eq!(h.reconciler.reconcile(&key()).await, Reconcile::Resolved);
        assert_eq!(h.fake.log_opens(), 2);
        h.state.close_tail();
    }

    #[tokio::test]
    async fn unknown_phase_is_retried() {
        let h = harness();
        h.cache
            .apply(WorkloadSnapshot::new("ns", "w", Phase::from("Evicted")));

        assert_eq!(h.reconciler.reconcile(&key()).await, Reconcile::Retry);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_are_capped_then_dropped() {
        let h = harness();
        h.cache.apply(WorkloadSnapshot::new("ns", "w", Phase::Unknown));
        h.queue.add(key());

        let queue = h.queue.clone();
        let worker = tokio::spawn(h.reconciler.run());

        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        queue.shutdown();
        assert_eq!(worker.await.unwrap(), None);

        let outcomes = h.metrics.outcomes();
        assert_eq!(outcomes.len(), 6);
        assert!(outcomes.iter().all(|o| *o == ReconcileOutcome::Retry));
        assert_eq!(h.metrics.dropped.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(queue.num_requeues(&key()), 0);
    }

    #[tokio::test]
    async fn terminal_phase_runs_cleanup_and_stops() {
        let h = harness();
        h.cache
            .apply(WorkloadSnapshot::new("ns", "w", Phase::Succeeded));
        h.queue.add(key());

        let result = h.reconciler.run().await.unwrap();

        assert_eq!(result.exit_code(), 0);
        assert_eq!(h.fake.deletes(), vec![key()]);
    }
}
