//! Abstract cluster capability consumed by the supervision engine.
//!
//! The engine never talks to the orchestrator directly; a concrete client (for example the
//! Kubernetes adapter in `hb-kube`) is injected as `Arc<dyn ClusterClient>`.
mod error;
pub use error::ClientError;

use async_trait::async_trait;
use futures::stream::BoxStream;

use hb_model::{WorkloadKey, WorkloadSnapshot};

/// Result of a list call: decoded workloads plus the version to start watching from.
#[derive(Debug, Clone, Default)]
pub struct WorkloadList {
    pub items: Vec<WorkloadSnapshot>,
    pub resource_version: String,
}

/// Change notification delivered by a watch stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The workload was added or modified.
    Applied(WorkloadSnapshot),
    /// The workload was removed; carries its last known state.
    Deleted(WorkloadSnapshot),
}

impl WatchEvent {
    pub fn snapshot(&self) -> &WorkloadSnapshot {
        match self {
            WatchEvent::Applied(s) | WatchEvent::Deleted(s) => s,
        }
    }
}

/// Stream of watch notifications; ends when the server closes the watch.
pub type WatchStream = BoxStream<'static, Result<WatchEvent, ClientError>>;

/// Stream of workload output, one line (including its trailing newline, if any) per item.
pub type LogStream = BoxStream<'static, Result<Vec<u8>, ClientError>>;

/// Watch/list/get-logs/delete capability over workloads.
#[async_trait]
pub trait ClusterClient: Send + Sync + 'static {
    /// List workloads in `namespace` matching the label `selector`.
    async fn list(&self, namespace: &str, selector: &str) -> Result<WorkloadList, ClientError>;

    /// Watch workloads in `namespace` matching `selector`, starting after `resource_version`.
    async fn watch(
        &self,
        namespace: &str,
        selector: &str,
        resource_version: &str,
    ) -> Result<WatchStream, ClientError>;

    /// Open a following read of the workload's output.
    async fn log_stream(&self, key: &WorkloadKey) -> Result<LogStream, ClientError>;

    /// Delete the workload.
    async fn delete(&self, key: &WorkloadKey) -> Result<(), ClientError>;
}
