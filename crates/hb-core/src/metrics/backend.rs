use std::sync::Arc;

use hb_model::{Phase, WorkloadKey};

use crate::shutdown::CleanupStatus;

/// Reconciliation outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing left to do for this observation.
    Resolved,
    /// Observation could not be settled yet and was requeued.
    Retry,
    /// Workload reached a terminal state.
    Terminal,
}

impl ReconcileOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ReconcileOutcome::Resolved => "resolved",
            ReconcileOutcome::Retry => "retry",
            ReconcileOutcome::Terminal => "terminal",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected through [`crate::Supervisor::with_metrics`].
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record one reconciliation pass.
    ///
    /// # Arguments
    /// - `phase`: Phase of the observed workload
    /// - `outcome`: How the pass ended
    fn record_reconcile(&self, phase: &Phase, outcome: ReconcileOutcome);
    /// Record an item dropped after exhausting its retries.
    fn record_retry_dropped(&self, key: &WorkloadKey);
    /// Record that output forwarding was started.
    fn record_tail_started(&self);
    /// Record the outcome of the single cleanup run.
    fn record_cleanup(&self, status: &CleanupStatus);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
