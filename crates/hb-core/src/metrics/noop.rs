use hb_model::{Phase, WorkloadKey};

use crate::metrics::backend::{MetricsBackend, ReconcileOutcome};
use crate::shutdown::CleanupStatus;

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_reconcile(&self, _: &Phase, _: ReconcileOutcome) {}

    #[inline(always)]
    fn record_retry_dropped(&self, _: &WorkloadKey) {}

    #[inline(always)]
    fn record_tail_started(&self) {}

    #[inline(always)]
    fn record_cleanup(&self, _: &CleanupStatus) {}
}
