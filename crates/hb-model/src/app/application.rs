use serde::{Deserialize, Serialize};

use super::ContainerConfig;

/// One launchable application from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationConfig {
    /// Application name, selected with `--application`.
    pub name: String,
    /// Location of the manifest template.
    pub template: String,
    /// Container settings substituted into the template.
    #[serde(default)]
    pub container: ContainerConfig,
    /// Per-launch unique identifier.
    ///
    /// Never read from configuration; assigned when the application is resolved.
    #[serde(skip)]
    pub unique_id: String,
}

impl ApplicationConfig {
    /// Value of the unique label stamped on the launched workload: `<name>-<unique id>`.
    pub fn unique_label_value(&self) -> String {
        format!("{}-{}", self.name, self.unique_id)
    }
}
