use rust_decimal::Decimal;

use super::portfolios_errors::Result;
use super::portfolios_model::{NewPortfolio, Portfolio};

/// Trait defining the contract for Portfolio repository operations.
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;
    fn get_by_name(&self, name: &str) -> Result<Portfolio>;
    /// Create-if-absent; when the portfolio exists, its value is updated only
    /// if a different value is supplied.
    fn upsert(&self, name: &str, value: Option<Decimal>) -> Result<Portfolio>;
    fn list(&self) -> Result<Vec<Portfolio>>;
}
