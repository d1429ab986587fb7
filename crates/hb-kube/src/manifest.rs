use k8s_openapi::api::core::v1::Pod;

use crate::error::KubeError;

const RESTART_NEVER: &str = "Never";

/// Parse a rendered manifest into a pod ready to be created in `namespace`.
///
/// The manifest must describe a `Pod`. Its namespace is overwritten with `namespace` and its
/// restart policy is forced to `Never`, so the pod reaches a terminal phase instead of looping.
pub fn parse_manifest(namespace: &str, manifest: &str) -> Result<Pod, KubeError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(manifest).map_err(|e| KubeError::Manifest(e.to_string()))?;

    let kind = value
        .get("kind")
        .and_then(serde_yaml::Value::as_str)
        .ok_or_else(|| KubeError::Manifest("missing kind".into()))?;
    if kind != "Pod" {
        return Err(KubeError::NotAPod {
            kind: kind.to_string(),
        });
    }

    let mut pod: Pod =
        serde_yaml::from_value(value).map_err(|e| KubeError::Manifest(e.to_string()))?;

    let spec = pod
        .spec
        .as_mut()
        .ok_or_else(|| KubeError::Manifest("pod has no spec".into()))?;
    spec.restart_policy = Some(RESTART_NEVER.to_string());
    pod.metadata.namespace = Some(namespace.to_string());

    Ok(pod)
}
