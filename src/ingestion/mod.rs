pub(crate) mod ingestion_errors;
pub(crate) mod ingestion_model;
pub(crate) mod ingestion_service;

#[cfg(test)]
mod ingestion_tests;

// Re-export the public interface
pub use ingestion_errors::{IngestionError, Result};
pub use ingestion_model::{
    ImportSheet, ImportWorkbook, IngestOptions, IngestionSummary, PriceRecord, WeightRecord,
};
pub use ingestion_service::{initial_holdings, reshape_prices, reshape_weights, IngestionService};
