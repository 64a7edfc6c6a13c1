use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::assets::AssetError;
use crate::holdings::HoldingError;
use crate::ingestion::IngestionError;
use crate::portfolios::PortfolioError;
use crate::prices::PriceError;
use crate::transactions::TransactionError;
use crate::valuation::ValuationError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Asset operation failed: {0}")]
    Asset(#[from] AssetError),

    #[error("Portfolio operation failed: {0}")]
    Portfolio(#[from] PortfolioError),

    #[error("Price operation failed: {0}")]
    Price(#[from] PriceError),

    #[error("Holding operation failed: {0}")]
    Holding(#[from] HoldingError),

    #[error("Transaction operation failed: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// Implement From for DieselError to Error directly
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        Error::Database(DatabaseError::QueryFailed(err))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(e))
    }
}
