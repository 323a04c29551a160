use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the schedule, late fee, and storage layers.
#[derive(Debug, Error)]
pub enum RentalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, RentalError>;

impl From<std::io::Error> for RentalError {
    fn from(err: std::io::Error) -> Self {
        RentalError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RentalError {
    fn from(err: serde_json::Error) -> Self {
        RentalError::Storage(err.to_string())
    }
}
