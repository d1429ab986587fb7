//! Everything that happens before supervision: configuration, application lookup and
//! manifest rendering.
mod error;
pub use error::LaunchError;

mod config;
pub use config::{CONFIG_FILE_NAME, HumpbackConfig, UNIQUE_ID_LEN};

mod render;
pub use render::render;

mod template;
pub use template::TemplateSource;

mod plan;
pub use plan::LaunchPlan;
