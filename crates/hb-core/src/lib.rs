//! Supervision engine for a single launched workload.
//!
//! Pipeline: [`feed`] (list + watch into a local cache) → [`queue`] (deduplicating,
//! rate-limited work queue) → [`reconcile`] (phase state machine) → [`tail`] or cleanup.
//! The [`shutdown`] listener races the reconciler to the same guarded cleanup.
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod queue;
pub mod reconcile;
pub mod shutdown;
pub mod supervisor;
pub mod tail;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientError, ClusterClient, LogStream, WatchEvent, WatchStream, WorkloadList};
pub use config::SupervisorConfig;
pub use error::CoreError;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, ReconcileOutcome, noop_metrics};
pub use shutdown::{CleanupStatus, ShutdownListener, ShutdownSignal, SupervisionResult, Trigger};
pub use supervisor::Supervisor;
pub use tail::{LineSink, StdoutSink};
