pub(crate) mod ledger;
pub(crate) mod valuation_calculator;
pub(crate) mod valuation_errors;
pub(crate) mod valuation_model;
pub(crate) mod valuation_service;
pub(crate) mod valuation_traits;

#[cfg(test)]
mod ledger_tests;

// Re-export the public interface
pub use ledger::adjusted_quantities;
pub use valuation_calculator::{portfolio_value, weights};
pub use valuation_errors::{Result, ValuationError};
pub use valuation_model::{Position, ValuationRecord};
pub use valuation_service::{build_value_series, ValuationService};
pub use valuation_traits::ValuationServiceTrait;
