use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for portfolio-related operations
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for PortfolioError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PortfolioError::NotFound("Portfolio not found".to_string()),
            _ => PortfolioError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for portfolio operations
pub type Result<T> = std::result::Result<T, PortfolioError>;
