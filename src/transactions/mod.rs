pub(crate) mod transactions_errors;
pub(crate) mod transactions_model;
pub(crate) mod transactions_repository;
pub(crate) mod transactions_service;
pub(crate) mod transactions_traits;


// Re-export the public interface
pub use transactions_errors::{Result, TransactionError};
pub use transactions_model::{
    NewTrade, NewTransaction, Transaction, TransactionSide, TRANSACTION_SIDE_BUY,
    TRANSACTION_SIDE_SELL,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
