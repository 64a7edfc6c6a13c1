use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::{AssetError, AssetRepositoryTrait};
use crate::holdings::HoldingRepositoryTrait;
use crate::prices::{PriceError, PriceRepositoryTrait};
use crate::valuation::adjusted_quantities;

use super::transactions_errors::{Result, TransactionError};
use super::transactions_model::{NewTrade, NewTransaction, Transaction, TransactionSide};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};

/// Service turning trade requests into persisted sell/buy transaction pairs.
/// This is the single enforcement point for oversold positions: the quantity
/// ledger itself never clamps.
pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            asset_repository,
            price_repository,
            holding_repository,
        }
    }

    fn asset_name(&self, asset_id: &str) -> Result<String> {
        match self.asset_repository.get_by_id(asset_id) {
            Ok(asset) => Ok(asset.name),
            Err(AssetError::NotFound(_)) => Err(TransactionError::InvalidData(format!(
                "Unknown asset: {}",
                asset_id
            ))),
            Err(e) => Err(TransactionError::DatabaseError(e.to_string())),
        }
    }

    fn price_at(&self, asset_id: &str, asset_name: &str, date: chrono::NaiveDate) -> Result<Decimal> {
        match self.price_repository.get_by_asset_and_date(asset_id, date) {
            Ok(price) => Ok(price.value),
            Err(PriceError::NotFound(_)) => Err(TransactionError::MissingPrice {
                asset: asset_name.to_string(),
                date,
            }),
            Err(e) => Err(TransactionError::DatabaseError(e.to_string())),
        }
    }

    /// Quantity bought or sold for a notional value at a unit price. A zero
    /// price yields a zero quantity rather than a division error.
    fn derive_quantity(value: Decimal, price: Decimal) -> Decimal {
        if price.is_zero() {
            Decimal::ZERO
        } else {
            value / price
        }
    }
}

impl TransactionServiceTrait for TransactionService {
    fn create_trade(&self, trade: NewTrade) -> Result<(Transaction, Transaction)> {
        trade.validate()?;

        let sell_name = self.asset_name(&trade.asset_to_sell)?;
        let buy_name = self.asset_name(&trade.asset_to_buy)?;

        let sell_price = self.price_at(&trade.asset_to_sell, &sell_name, trade.date)?;
        let buy_price = self.price_at(&trade.asset_to_buy, &buy_name, trade.date)?;

        let quantity_to_sell = Self::derive_quantity(trade.value, sell_price);
        let quantity_to_buy = Self::derive_quantity(trade.value, buy_price);

        // Replay the ledger up to the trade date and reject an oversold position.
        let baseline = self
            .holding_repository
            .get_baseline(&trade.portfolio_id)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;
        let baseline_quantities: HashMap<String, Decimal> = baseline
            .into_iter()
            .map(|h| (h.asset_id, h.quantity))
            .collect();
        let prior = self
            .transaction_repository
            .list_for_portfolio(&trade.portfolio_id)?;
        let held = adjusted_quantities(&baseline_quantities, &prior, trade.date)
            .get(&trade.asset_to_sell)
            .copied()
            .unwrap_or_default();

        if held < quantity_to_sell {
            return Err(TransactionError::InsufficientQuantity {
                asset: sell_name,
                held,
                requested: quantity_to_sell,
            });
        }

        debug!(
            "Creating trade for portfolio {} on {}: sell {} {} / buy {} {}",
            trade.portfolio_id, trade.date, quantity_to_sell, sell_name, quantity_to_buy, buy_name
        );

        let sell = NewTransaction {
            portfolio_id: trade.portfolio_id.clone(),
            asset_id: trade.asset_to_sell.clone(),
            date: trade.date,
            side: TransactionSide::Sell,
            quantity: quantity_to_sell,
            price: sell_price,
            value: trade.value,
        };
        let buy = NewTransaction {
            portfolio_id: trade.portfolio_id.clone(),
            asset_id: trade.asset_to_buy.clone(),
            date: trade.date,
            side: TransactionSide::Buy,
            quantity: quantity_to_buy,
            price: buy_price,
            value: trade.value,
        };

        self.transaction_repository.create_pair(sell, buy)
    }

    fn list_for_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repository.list_for_portfolio(portfolio_id)
    }

    /// Administrative bulk reset. Transactions are otherwise append-only.
    fn delete_all(&self) -> Result<usize> {
        self.transaction_repository.delete_all()
    }
}
