//! Common model-level constants.
//!
//! Well-known label keys and status strings shared by the launcher and the supervision engine.

/// Label key carrying the per-launch unique value used to select the supervised workload.
///
/// The launcher stamps `appUnique=<application>-<unique id>` on the rendered manifest and
/// the observation feed watches with the same selector.
pub const LABEL_APP_UNIQUE: &str = "appUnique";

/// Waiting reason reported while the container image/runtime is still being prepared.
///
/// This is the only waiting reason tolerated while a workload is `Pending`.
pub const REASON_CONTAINER_CREATING: &str = "ContainerCreating";

/// Maximum length of a Kubernetes label value.
pub const MAX_LABEL_VALUE_LEN: usize = 63;
