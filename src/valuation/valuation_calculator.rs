use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::constants::{VALUE_DECIMAL_PRECISION, WEIGHT_DECIMAL_PRECISION};

use super::valuation_errors::{Result, ValuationError};

/// Total value of the held quantities priced against a day's snapshot.
///
/// Sums quantity × price over the assets present in both maps. An asset
/// without a price is excluded from the sum — deliberate policy, logged at
/// debug level, distinct from a data error. The result is rounded to 2
/// decimal places, round-half-to-even, the fixed rounding policy for
/// portfolio values throughout the crate.
pub fn portfolio_value(
    quantities: &HashMap<String, Decimal>,
    prices: &HashMap<String, Decimal>,
) -> Decimal {
    let mut total = Decimal::ZERO;

    for (asset_id, quantity) in quantities {
        if let Some(price) = prices.get(asset_id) {
            total += quantity * price;
        } else {
            debug!(
                "Missing price for asset {}; position excluded from portfolio value",
                asset_id
            );
        }
    }

    total.round_dp(VALUE_DECIMAL_PRECISION)
}

/// Weight of each priced asset: quantity × price / total value, rounded to 6
/// decimal places half-even.
///
/// Fails with `DivisionByZero` when `total_value` is zero; callers must
/// special-case empty or zero-valued portfolios instead of propagating that
/// upward.
pub fn weights(
    quantities: &HashMap<String, Decimal>,
    prices: &HashMap<String, Decimal>,
    total_value: Decimal,
) -> Result<HashMap<String, Decimal>> {
    if total_value.is_zero() {
        return Err(ValuationError::DivisionByZero);
    }

    let mut weights = HashMap::with_capacity(quantities.len());
    for (asset_id, quantity) in quantities {
        if let Some(price) = prices.get(asset_id) {
            let weight = (quantity * price / total_value).round_dp(WEIGHT_DECIMAL_PRECISION);
            weights.insert(asset_id.clone(), weight);
        }
    }

    Ok(weights)
}
