use serde::{Deserialize, Serialize};

/// Container settings of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ContainerConfig {
    /// Image reference.
    pub image: String,
    /// Command string supplied on the command line; never read from configuration.
    #[serde(skip)]
    pub arguments: String,
    pub resource_requests: ResourceConfig,
    pub resource_limits: ResourceConfig,
    /// Run-as user id.
    pub uid: String,
    /// Run-as group id.
    pub gid: String,
}

/// Memory/CPU quantities, kept as orchestrator quantity strings (`128Mi`, `250m`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub memory: String,
    pub cpu: String,
}
