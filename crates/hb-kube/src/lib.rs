//! Kubernetes implementation of the cluster capability.
//!
//! Pods are decoded into [`hb_model::WorkloadSnapshot`] at this boundary; nothing past it
//! touches `k8s-openapi` types.
mod error;
pub use error::{DecodeError, KubeError};

mod decode;
pub use decode::decode_pod;

mod manifest;
pub use manifest::parse_manifest;

mod cluster;
pub use cluster::{KubeCluster, connect};
