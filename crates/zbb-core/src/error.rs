use thiserror::Error;
use zbb_domain::{MoneyError, MonthError};

pub type CoreResult<T> = Result<T, CoreError>;

/// Failures raised by a [`LedgerRepository`](crate::LedgerRepository) backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unauthorized: no authenticated user")]
    Unauthorized,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Computation failed: {0}")]
    Computation(String),
}

impl From<MoneyError> for CoreError {
    fn from(err: MoneyError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<MonthError> for CoreError {
    fn from(err: MonthError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
