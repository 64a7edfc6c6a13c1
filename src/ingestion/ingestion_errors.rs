use chrono::NaiveDate;
use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for ingestion operations. Any variant aborts the whole
/// batch; partial ingestion is never observable.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Malformed input: {0}")]
    Format(String),
    #[error("No price available for asset '{asset}' on {date}")]
    MissingPrice { asset: String, date: NaiveDate },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for IngestionError {
    fn from(err: DieselError) -> Self {
        IngestionError::DatabaseError(err.to_string())
    }
}

impl From<csv::Error> for IngestionError {
    fn from(err: csv::Error) -> Self {
        IngestionError::Format(format!("Failed to read table: {}", err))
    }
}

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestionError>;
