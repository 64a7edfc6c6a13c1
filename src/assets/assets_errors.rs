use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for asset-related operations
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for AssetError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AssetError::NotFound("Asset not found".to_string()),
            _ => AssetError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;
