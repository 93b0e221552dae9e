//! Errors raised by the news client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("News API key is not configured (set GNEWS_API_KEY)")]
    MissingApiKey,

    #[error("News request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("News API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse news response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<NewsError> for supply_core::Error {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::MissingApiKey => supply_core::Error::Config(err.to_string()),
            other => supply_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
