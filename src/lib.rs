pub mod db;

pub mod assets;
pub mod holdings;
pub mod ingestion;
pub mod portfolios;
pub mod prices;
pub mod transactions;
pub mod valuation;

pub mod constants;
pub mod errors;
pub mod schema;

pub use valuation::*;
