use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hb_core::SupervisorConfig;
use hb_model::ApplicationConfig;

use crate::error::LaunchError;

/// File name looked up inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "humpback.yaml";

/// Length of the per-launch id: 20 hex chars, leaving 42 for the application name under the
/// 63-char label value limit.
pub const UNIQUE_ID_LEN: usize = 20;

/// Content of `humpback.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HumpbackConfig {
    #[serde(default)]
    pub applications: Vec<ApplicationConfig>,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
}

impl HumpbackConfig {
    /// Load `<dir>/humpback.yaml`.
    pub fn load(dir: &Path) -> Result<Self, LaunchError> {
        let path = dir.join(CONFIG_FILE_NAME);
        debug!(path = %path.display(), "loading configuration");

        let raw = fs::read_to_string(&path).map_err(|e| LaunchError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|e| LaunchError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        config.supervisor.validate().map_err(|e| LaunchError::Config {
            path,
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Pick `application` and prepare it for one launch of `command`.
    ///
    /// The returned copy carries a fresh unique id and the command as container arguments.
    pub fn resolve(&self, application: &str, command: &str) -> Result<ApplicationConfig, LaunchError> {
        let mut app = self
            .applications
            .iter()
            .find(|a| a.name == application)
            .cloned()
            .ok_or_else(|| LaunchError::ApplicationNotFound(application.to_string()))?;

        app.unique_id = unique_id();
        app.container.arguments = command.to_string();

        info!(
            application = %app.name,
            image = %app.container.image,
            template = %app.template,
            unique_id = %app.unique_id,
            "application resolved"
        );
        Ok(app)
    }
}

fn unique_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(UNIQUE_ID_LEN);
    id
}
