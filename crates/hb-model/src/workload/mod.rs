mod phase;
pub use phase::Phase;

mod container;
pub use container::ContainerStatus;

mod snapshot;
pub use snapshot::WorkloadSnapshot;
