use thiserror::Error;

/// Failure of a cluster client call.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("api error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("decode error: {0}")]
    Decode(String),

    /// The watch position is no longer served; the caller must list again.
    #[error("watch expired: {0}")]
    Expired(String),
}

impl ClientError {
    /// Returns `true` when the error means the object does not exist.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}
