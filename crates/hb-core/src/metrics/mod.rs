//! Metrics collection abstraction for the supervision engine.
//!
//! Backends implement [`MetricsBackend`] and are injected into the [`crate::Supervisor`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, ReconcileOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
