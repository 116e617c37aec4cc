//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] tickflow_core::CoreError),

    #[error(transparent)]
    Rest(#[from] tickflow_rest::RestError),

    #[error("Signal handling error: {0}")]
    Signal(String),
}

pub type AppResult<T> = Result<T, AppError>;
