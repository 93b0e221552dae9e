//! Error types for supply-index

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the index pipeline
pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Index at {} is incompatible: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<supply_core::Error> for IndexError {
    fn from(err: supply_core::Error) -> Self {
        match err {
            supply_core::Error::Io(e) => IndexError::Io(e),
            other => IndexError::Config(other.to_string()),
        }
    }
}

impl From<IndexError> for supply_core::Error {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Config(msg) => supply_core::Error::Config(msg),
            IndexError::Io(e) => supply_core::Error::Io(e),
            other => supply_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
