use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::client::ClusterClient;
use crate::metrics::MetricsHandle;
use crate::reconcile::ReconcilerState;

use super::{CleanupStatus, SupervisionResult, Trigger};

/// How long cleanup waits for the tail task to flush before deleting.
const TAIL_GRACE: Duration = Duration::from_secs(2);

/// The single teardown path: stop tailing, then delete the workload.
///
/// Every clone shares one guard; whichever trigger arrives first runs the teardown and later
/// callers wait for and receive the same [`SupervisionResult`].
#[derive(Clone)]
pub struct Cleanup {
    client: Arc<dyn ClusterClient>,
    state: Arc<ReconcilerState>,
    metrics: MetricsHandle,
}

impl Cleanup {
    pub fn new(
        client: Arc<dyn ClusterClient>,
        state: Arc<ReconcilerState>,
        metrics: MetricsHandle,
    ) -> Self {
        Self {
            client,
            state,
            metrics,
        }
    }

    pub async fn run(&self, trigger: Trigger) -> SupervisionResult {
        self.state
            .cleanup
            .get_or_init(|| self.execute(trigger))
            .await
            .clone()
    }

    #[instrument(name = "cleanup", skip_all, fields(trigger = %trigger))]
    async fn execute(&self, trigger: Trigger) -> SupervisionResult {
        info!("cleaning up");

        if let Some(tail) = self.state.close_tail() {
            tail.wait(TAIL_GRACE).await;
        }

        let workload = self.state.workload();
        let cleanup = match &workload {
            None => {
                warn!("no workload resolved, nothing to delete");
                CleanupStatus::NothingToDelete
            }
            Some(key) => match self.client.delete(key).await {
                Ok(()) => {
                    info!(workload = %key, "workload deleted");
                    CleanupStatus::Deleted
                }
                Err(e) if e.is_not_found() => {
                    info!(workload = %key, "workload already gone");
                    CleanupStatus::AlreadyGone
                }
                Err(e) => {
                    error!(workload = %key, error = %e, "failed to delete workload, it may still be running");
                    CleanupStatus::DeleteFailed(e.to_string())
                }
            },
        };
        self.metrics.record_cleanup(&cleanup);

        SupervisionResult {
            trigger,
            workload,
            cleanup,
        }
    }
}
