//! Error types for supply-datagen

use thiserror::Error;

/// Result type alias for the generator
pub type Result<T> = std::result::Result<T, DatagenError>;

#[derive(Error, Debug)]
pub enum DatagenError {
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot generate materials without supplier ids")]
    NoSuppliers,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<supply_core::Error> for DatagenError {
    fn from(err: supply_core::Error) -> Self {
        DatagenError::InvalidConfig(err.to_string())
    }
}

impl From<DatagenError> for supply_core::Error {
    fn from(err: DatagenError) -> Self {
        match err {
            DatagenError::InvalidConfig(msg) => supply_core::Error::Config(msg),
            DatagenError::Io(e) => supply_core::Error::Io(e),
            other => supply_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
