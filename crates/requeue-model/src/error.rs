use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown http method: {0}")]
    UnknownMethod(String),

    #[error("unknown retry policy: {0}")]
    UnknownPolicy(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
