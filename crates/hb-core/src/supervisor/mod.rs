//! Entry point of the engine: wires feed, queue, reconciler and cleanup for one workload.
//! - Spawns the feed and waits (bounded) for the first list.
//! - Spawns the single reconciler worker.
//! - Races the worker against the shutdown future; both end in the same cleanup.
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use hb_model::WorkloadKey;

use crate::client::ClusterClient;
use crate::config::SupervisorConfig;
use crate::error::CoreError;
use crate::feed::{Feed, WorkloadCache};
use crate::metrics::{MetricsHandle, noop_metrics};
use crate::queue::{ItemExponentialLimiter, WorkQueue};
use crate::reconcile::{Reconciler, ReconcilerState};
use crate::shutdown::{Cleanup, ShutdownSignal, SupervisionResult, Trigger};
use crate::tail::{LineSink, StdoutSink};

/// Supervises the single workload matched by `selector` in `namespace`.
pub struct Supervisor {
    client: Arc<dyn ClusterClient>,
    namespace: String,
    selector: String,
    config: SupervisorConfig,
    metrics: MetricsHandle,
    sink: Arc<dyn LineSink>,
    known: Option<WorkloadKey>,
}

impl Supervisor {
    pub fn new(
        client: Arc<dyn ClusterClient>,
        namespace: impl Into<String>,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            selector: selector.into(),
            config: SupervisorConfig::default(),
            metrics: noop_metrics(),
            sink: Arc::new(StdoutSink),
            known: None,
        }
    }

    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the output destination (stdout by default).
    pub fn with_sink(mut self, sink: Arc<dyn LineSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Pre-seed the workload reference, so cleanup can delete it before the first notification.
    pub fn with_known_workload(mut self, key: WorkloadKey) -> Self {
        self.known = Some(key);
        self
    }

    /// Supervise until the workload ends or `shutdown` resolves.
    ///
    /// Cleanup has always run when this returns, including on [`CoreError::SyncTimeout`].
    #[instrument(name = "supervisor", skip_all, fields(namespace = %self.namespace, selector = %self.selector))]
    pub async fn run<F>(self, shutdown: F) -> Result<SupervisionResult, CoreError>
    where
        F: Future<Output = ShutdownSignal>,
    {
        self.config.validate()?;

        let cache = WorkloadCache::new();
        let queue = WorkQueue::new(ItemExponentialLimiter::new(self.config.backoff.clone()));
        let state = Arc::new(match self.known.clone() {
            Some(key) => ReconcilerState::with_workload(key),
            None => ReconcilerState::new(),
        });
        let cleanup = Cleanup::new(
            Arc::clone(&self.client),
            Arc::clone(&state),
            Arc::clone(&self.metrics),
        );

        let stop = CancellationToken::new();
        let (synced_tx, mut synced_rx) = watch::channel(false);
        let feed = Feed::new(
            Arc::clone(&self.client),
            self.namespace.clone(),
            self.selector.clone(),
            cache.clone(),
            queue.clone(),
            self.config.watch_retry(),
        );
        let feed_task = tokio::spawn(feed.run(synced_tx, stop.clone()));

        tokio::pin!(shutdown);

        let sync_timeout = self.config.sync_timeout();
        let synced = tokio::select! {
            sig = &mut shutdown => Err(sig),
            res = tokio::time::timeout(sync_timeout, async { synced_rx.wait_for(|s| *s).await.is_ok() }) => {
                Ok(matches!(res, Ok(true)))
            }
        };

        match synced {
            Ok(true) => info!("workload cache synced"),
            Ok(false) => {
                error!(timeout_ms = self.config.sync_timeout_ms, "timed out waiting for caches to sync");
                cleanup
                    .run(Trigger::Failed {
                        reason: "workload cache did not sync".into(),
                    })
                    .await;
                stop.cancel();
                queue.shutdown();
                let _ = feed_task.await;
                return Err(CoreError::SyncTimeout {
                    after_ms: self.config.sync_timeout_ms,
                });
            }
            Err(sig) => {
                info!(signal = %sig, "shutdown requested before sync");
                let result = cleanup.run(Trigger::Signal(sig)).await;
                stop.cancel();
                queue.shutdown();
                let _ = feed_task.await;
                return Ok(result);
            }
        }

        let reconciler = Reconciler::new(
            Arc::clone(&self.client),
            cache,
            queue.clone(),
            Arc::clone(&state),
            cleanup.clone(),
            Arc::clone(&self.sink),
            Arc::clone(&self.metrics),
            self.config.max_retries,
        );
        let mut worker = tokio::spawn(reconciler.run());

        let result = tokio::select! {
            joined = &mut worker => match joined {
                Ok(Some(result)) => result,
                Ok(None) => {
                    cleanup.run(Trigger::Failed { reason: "reconciler stopped".into() }).await
                }
                Err(e) => {
                    error!(error = %e, "reconciler task failed");
                    cleanup.run(Trigger::Failed { reason: format!("reconciler task failed: {e}") }).await
                }
            },
            sig = &mut shutdown => {
                info!(signal = %sig, "shutdown requested");
                cleanup.run(Trigger::Signal(sig)).await
            }
        };

        stop.cancel();
        queue.shutdown();
        worker.abort();
        let _ = feed_task.await;

        info!(
            trigger = %result.trigger,
            cleanup = result.cleanup.as_label(),
            exit_code = result.exit_code(),
            "supervision finished"
        );
        Ok(result)
    }
}
