use serde::{Deserialize, Serialize};

use crate::{WorkloadKey, workload::{ContainerStatus, Phase}};

/// Latest known status of the supervised workload.
///
/// Produced by the observation feed from decoded watch events; consumers only read copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSnapshot {
    pub name: String,
    pub namespace: String,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerStatus>,
}

impl WorkloadSnapshot {
    /// Create a snapshot without container statuses.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, phase: Phase) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            phase,
            containers: Vec::new(),
        }
    }

    /// Replace the container statuses and return the updated snapshot.
    pub fn with_containers(mut self, containers: Vec<ContainerStatus>) -> Self {
        self.containers = containers;
        self
    }

    /// Stable `namespace/name` key.
    pub fn key(&self) -> WorkloadKey {
        WorkloadKey::new(&self.namespace, &self.name)
    }

    /// First container stuck waiting on anything other than `ContainerCreating`.
    pub fn startup_failure(&self) -> Option<&ContainerStatus> {
        self.containers
            .iter()
            .find(|c| c.startup_failure().is_some())
    }
}
