use std::path::Path;

use tracing::debug;

use hb_model::{ApplicationConfig, LABEL_APP_UNIQUE, Labels};

use crate::error::LaunchError;
use crate::render::render;
use crate::template::TemplateSource;

/// Everything the binary needs to create and then supervise one workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Rendered manifest, ready to be submitted.
    pub manifest: String,
    /// Label selector matching only this launch.
    pub selector: String,
    pub application: ApplicationConfig,
    pub unique_id: String,
}

impl LaunchPlan {
    /// Fetch and render the template of a resolved `app`.
    ///
    /// See [`TemplateSource::locate`] for how the template reference is interpreted.
    pub async fn build(config_dir: &Path, app: ApplicationConfig) -> Result<Self, LaunchError> {
        let unique = app.unique_label_value();
        Labels::validate_value(&unique)?;

        let source = TemplateSource::locate(config_dir, &app.template);
        let template = source.fetch().await?;
        let manifest = render(&template, &app)?;
        debug!(template = %source, manifest = %manifest, "manifest rendered");

        let mut labels = Labels::new();
        labels.insert(LABEL_APP_UNIQUE, unique);

        Ok(Self {
            manifest,
            selector: labels.selector(),
            unique_id: app.unique_id.clone(),
            application: app,
        })
    }
}
