use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::AssetRepositoryTrait;
use crate::holdings::HoldingRepositoryTrait;
use crate::portfolios::PortfolioRepositoryTrait;
use crate::prices::{PriceRepositoryTrait, PriceSnapshot};
use crate::transactions::{Transaction, TransactionRepositoryTrait};

use super::ledger::{adjusted_quantities, apply_transaction};
use super::valuation_calculator::{portfolio_value, weights};
use super::valuation_errors::{Result, ValuationError};
use super::valuation_model::{Position, ValuationRecord};
use super::valuation_traits::ValuationServiceTrait;

/// Builds the valuation series for a date range from explicit inputs. Pure:
/// every price snapshot is an argument, never an implicit lookup.
///
/// Emits one record per calendar date in `[start_date, end_date]` inclusive,
/// ascending. Quantities are replayed incrementally along the range, which is
/// identical to a full replay per date because dates advance monotonically
/// and `transactions` is ordered. A date with no prices (or a zero total)
/// yields a dense record with value 0 and empty weights rather than being
/// skipped, keeping the series one record per day.
///
/// `asset_names` maps asset ids to display names for the weight keys; an
/// unmapped id is kept as-is.
pub fn build_value_series(
    portfolio_id: &str,
    baseline: &HashMap<String, Decimal>,
    transactions: &[Transaction],
    prices_by_date: &HashMap<NaiveDate, PriceSnapshot>,
    asset_names: &HashMap<String, String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<ValuationRecord> {
    let empty_snapshot = PriceSnapshot::new();
    let mut quantities = baseline.clone();
    let mut pending = transactions.iter().peekable();
    let mut records = Vec::new();

    let mut date = start_date;
    while date <= end_date {
        // Transactions dated before the range start are replayed here on the
        // first iteration, so the range can begin after the baseline date.
        while let Some(tx) = pending.peek() {
            if tx.date > date {
                break;
            }
            apply_transaction(&mut quantities, tx);
            pending.next();
        }

        let prices = prices_by_date.get(&date).unwrap_or(&empty_snapshot);
        let value = portfolio_value(&quantities, prices);

        let day_weights = if value.is_zero() {
            HashMap::new()
        } else {
            match weights(&quantities, prices, value) {
                Ok(w) => w
                    .into_iter()
                    .map(|(asset_id, weight)| {
                        let key = asset_names.get(&asset_id).cloned().unwrap_or(asset_id);
                        (key, weight)
                    })
                    .collect(),
                Err(ValuationError::DivisionByZero) => HashMap::new(),
                Err(_) => HashMap::new(),
            }
        };

        records.push(ValuationRecord {
            date,
            portfolio_id: portfolio_id.to_string(),
            value,
            weights: day_weights,
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    records
}

/// Service producing valuation series and position snapshots for a portfolio.
/// Reads holdings, transactions and prices through their repositories; never
/// mutates them.
pub struct ValuationService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
}

impl ValuationService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            holding_repository,
            transaction_repository,
            price_repository,
            asset_repository,
        }
    }

    fn baseline_quantities(&self, portfolio_id: &str) -> Result<HashMap<String, Decimal>> {
        let baseline = self.holding_repository.get_baseline(portfolio_id)?;
        Ok(baseline
            .into_iter()
            .map(|h| (h.asset_id, h.quantity))
            .collect())
    }
}

impl ValuationServiceTrait for ValuationService {
    fn value_series(
        &self,
        portfolio_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ValuationRecord>> {
        if start_date > end_date {
            return Err(ValuationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        let portfolio = self.portfolio_repository.get_by_id(portfolio_id)?;
        debug!(
            "Computing value series for portfolio {} from {} to {}",
            portfolio.name, start_date, end_date
        );

        let baseline = self.baseline_quantities(portfolio_id)?;
        let transactions = self.transaction_repository.list_for_portfolio(portfolio_id)?;
        let prices_by_date = self
            .price_repository
            .snapshots_in_range(start_date, end_date)?;
        let asset_names: HashMap<String, String> = self
            .asset_repository
            .list()?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();

        Ok(build_value_series(
            portfolio_id,
            &baseline,
            &transactions,
            &prices_by_date,
            &asset_names,
            start_date,
            end_date,
        ))
    }

    fn positions_at(&self, portfolio_id: &str, date: NaiveDate) -> Result<Vec<Position>> {
        self.portfolio_repository.get_by_id(portfolio_id)?;

        let baseline = self.baseline_quantities(portfolio_id)?;
        let transactions = self.transaction_repository.list_for_portfolio(portfolio_id)?;

        let mut positions: Vec<Position> = adjusted_quantities(&baseline, &transactions, date)
            .into_iter()
            .map(|(asset_id, quantity)| Position {
                asset_id,
                portfolio_id: portfolio_id.to_string(),
                quantity,
            })
            .collect();
        positions.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));

        Ok(positions)
    }
}
