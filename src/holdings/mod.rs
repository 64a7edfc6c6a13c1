pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;
pub(crate) mod holdings_traits;

// Re-export the public interface
pub use holdings_errors::{HoldingError, Result};
pub use holdings_model::{Holding, NewHolding};
pub use holdings_repository::HoldingRepository;
pub use holdings_traits::HoldingRepositoryTrait;
