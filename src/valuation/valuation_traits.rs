use chrono::NaiveDate;

use super::valuation_errors::Result;
use super::valuation_model::{Position, ValuationRecord};

/// Trait defining the contract for Valuation service operations.
pub trait ValuationServiceTrait: Send + Sync {
    /// One valuation record per calendar date in `[start_date, end_date]`
    /// inclusive, ascending.
    fn value_series(
        &self,
        portfolio_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ValuationRecord>>;

    /// The portfolio's ledger-adjusted positions as of a date.
    fn positions_at(&self, portfolio_id: &str, date: NaiveDate) -> Result<Vec<Position>>;
}
