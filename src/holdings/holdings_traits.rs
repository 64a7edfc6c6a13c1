use chrono::NaiveDate;

use super::holdings_errors::Result;
use super::holdings_model::{Holding, NewHolding};

/// Trait defining the contract for Holding repository operations.
pub trait HoldingRepositoryTrait: Send + Sync {
    /// The portfolio's earliest-dated holdings, used as the replay baseline.
    fn get_baseline(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    fn list_for_portfolio_at(&self, portfolio_id: &str, date: NaiveDate) -> Result<Vec<Holding>>;
    /// Create-if-absent; when the (asset, portfolio, date) triple exists, the
    /// row is updated only if quantity or weight differ.
    fn upsert(&self, new_holding: NewHolding) -> Result<Holding>;
}
