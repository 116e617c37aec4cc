//! REST error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    /// The exchange answered with status >= 400. Carries the status and
    /// the raw response body, unmodified.
    #[error("Remote API error: status={status}, body={body}")]
    Remote { status: u16, body: String },

    /// A successful HTTP status with a body that does not parse.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Transport-level failure of the HTTP call.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Missing credential: {0}")]
    MissingCredentials(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

pub type RestResult<T> = Result<T, RestError>;
