mod domain;
pub use domain::{LABEL_APP_UNIQUE, MAX_LABEL_VALUE_LEN, REASON_CONTAINER_CREATING};
pub use domain::{Labels, WorkloadKey};

mod error;
pub use error::{ModelError, ModelResult};

mod workload;
pub use workload::{ContainerStatus, Phase, WorkloadSnapshot};

mod app;
pub use app::{ApplicationConfig, ContainerConfig, ResourceConfig};

mod strategy;
pub use strategy::BackoffStrategy;
