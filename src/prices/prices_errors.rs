use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for price-related operations
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for PriceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PriceError::NotFound("Price not found".to_string()),
            _ => PriceError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for price operations
pub type Result<T> = std::result::Result<T, PriceError>;
