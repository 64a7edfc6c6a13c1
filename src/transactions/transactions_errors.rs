use chrono::NaiveDate;
use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for transaction-related operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("No price available for asset '{asset}' on {date}")]
    MissingPrice { asset: String, date: NaiveDate },
    #[error("Insufficient quantity of asset '{asset}': held {held}, requested {requested}")]
    InsufficientQuantity {
        asset: String,
        held: rust_decimal::Decimal,
        requested: rust_decimal::Decimal,
    },
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => {
                TransactionError::NotFound("Transaction not found".to_string())
            }
            _ => TransactionError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for transaction operations
pub type Result<T> = std::result::Result<T, TransactionError>;
