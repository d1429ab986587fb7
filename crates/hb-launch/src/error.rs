use std::path::PathBuf;

use thiserror::Error;

use hb_model::ModelError;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to read configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("application '{0}' not found in configuration")]
    ApplicationNotFound(String),

    #[error("failed to read template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download template {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to render template: {0}")]
    Render(String),

    #[error(transparent)]
    Label(#[from] ModelError),
}
