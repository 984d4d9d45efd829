use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("invalid retry configuration: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
