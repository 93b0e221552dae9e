//! Errors from the model endpoint

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("model endpoint is not configured: {0}")]
    Config(String),

    /// Rejected before sending, or reported missing by the endpoint
    #[error("model '{0}' is not available")]
    UnsupportedModel(String),

    #[error("the endpoint rejected the API key")]
    Unauthorized,

    #[error("rate limited by the endpoint: {0}")]
    RateLimited(String),

    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The upstream model failed behind a successful HTTP response
    #[error("model call failed: {0}")]
    Upstream(String),

    #[error("malformed completion: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<LlmError> for supply_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Config(msg) => supply_core::Error::Config(msg),
            other => supply_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
