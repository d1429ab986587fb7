mod application;
pub use application::ApplicationConfig;

mod container;
pub use container::{ContainerConfig, ResourceConfig};
