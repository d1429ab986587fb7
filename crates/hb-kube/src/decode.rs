use k8s_openapi::api::core::v1::{ContainerStatus as PodContainerStatus, Pod};

use hb_model::{ContainerStatus, Phase, WorkloadSnapshot};

use crate::error::DecodeError;

/// Decode a pod into the engine's snapshot.
pub fn decode_pod(pod: &Pod) -> Result<WorkloadSnapshot, DecodeError> {
    let name = pod.metadata.name.clone().ok_or(DecodeError::MissingName)?;
    let namespace = pod
        .metadata
        .namespace
        .clone()
        .ok_or_else(|| DecodeError::MissingNamespace { name: name.clone() })?;
    let status = pod
        .status
        .as_ref()
        .ok_or_else(|| DecodeError::MissingStatus { name: name.clone() })?;

    let phase = status
        .phase
        .as_deref()
        .map(Phase::from)
        .unwrap_or_default();
    let containers = status
        .container_statuses
        .iter()
        .flatten()
        .map(container)
        .collect();

    Ok(WorkloadSnapshot::new(namespace, name, phase).with_containers(containers))
}

fn container(cs: &PodContainerStatus) -> ContainerStatus {
    let waiting = cs.state.as_ref().and_then(|s| s.waiting.as_ref());
    match waiting {
        Some(w) => ContainerStatus::waiting(&cs.name, w.reason.clone().unwrap_or_default()),
        None => ContainerStatus::ready(&cs.name),
    }
}
