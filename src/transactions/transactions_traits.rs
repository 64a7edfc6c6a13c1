use super::transactions_errors::Result;
use super::transactions_model::{NewTrade, NewTransaction, Transaction};

/// Trait defining the contract for Transaction service operations.
pub trait TransactionServiceTrait: Send + Sync {
    /// Turns a trade request into a persisted SELL/BUY pair, checking prices
    /// and the held quantity first.
    fn create_trade(&self, trade: NewTrade) -> Result<(Transaction, Transaction)>;
    fn list_for_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    fn delete_all(&self) -> Result<usize>;
}

/// Trait defining the contract for Transaction repository operations.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Inserts a sell/buy pair atomically: either both rows are committed or
    /// neither is.
    fn create_pair(&self, sell: NewTransaction, buy: NewTransaction)
        -> Result<(Transaction, Transaction)>;
    /// All transactions of a portfolio, ordered by (date, created_at, id) so
    /// replay order is stable and deterministic.
    fn list_for_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    fn delete_all(&self) -> Result<usize>;
}
