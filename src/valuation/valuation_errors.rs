use chrono::NaiveDate;
use thiserror::Error;

use crate::assets::AssetError;
use crate::holdings::HoldingError;
use crate::portfolios::PortfolioError;
use crate::prices::PriceError;
use crate::transactions::TransactionError;

/// Custom error type for valuation operations
#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("Portfolio value is zero; weights are undefined")]
    DivisionByZero,
    #[error("Invalid date range: {start} > {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PortfolioError> for ValuationError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::NotFound(msg) => ValuationError::NotFound(msg),
            other => ValuationError::DatabaseError(other.to_string()),
        }
    }
}

impl From<HoldingError> for ValuationError {
    fn from(err: HoldingError) -> Self {
        ValuationError::DatabaseError(err.to_string())
    }
}

impl From<PriceError> for ValuationError {
    fn from(err: PriceError) -> Self {
        ValuationError::DatabaseError(err.to_string())
    }
}

impl From<TransactionError> for ValuationError {
    fn from(err: TransactionError) -> Self {
        ValuationError::DatabaseError(err.to_string())
    }
}

impl From<AssetError> for ValuationError {
    fn from(err: AssetError) -> Self {
        ValuationError::DatabaseError(err.to_string())
    }
}

/// Result type for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;
