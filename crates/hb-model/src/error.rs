use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid label value '{value}': {reason}")]
    InvalidLabel { value: String, reason: &'static str },

    #[error("invalid backoff strategy: {0}")]
    InvalidBackoff(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
