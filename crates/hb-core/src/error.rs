use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("timed out after {after_ms}ms waiting for the workload cache to sync")]
    SyncTimeout { after_ms: u64 },

    #[error("invalid supervisor configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to register signal handler: {0}")]
    Signal(#[from] std::io::Error),

    #[error("cluster client error: {0}")]
    Client(#[from] ClientError),
}
