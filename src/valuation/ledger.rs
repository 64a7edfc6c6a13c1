use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::transactions::{Transaction, TRANSACTION_SIDE_BUY, TRANSACTION_SIDE_SELL};

/// Quantities of each asset a portfolio holds as of `as_of`, obtained by
/// replaying every transaction dated on or before `as_of` over the baseline
/// holdings.
///
/// Transactions must arrive ordered by (date, created_at, id) — the order the
/// transaction repository returns — so ties within a date resolve by
/// insertion order. A SELL subtracts, a BUY adds; an asset absent from the
/// baseline enters the map at the transaction's signed quantity. Pure
/// arithmetic: a sell that drives a balance negative is not clamped here,
/// that policy lives with the caller.
pub fn adjusted_quantities(
    baseline: &HashMap<String, Decimal>,
    transactions: &[Transaction],
    as_of: NaiveDate,
) -> HashMap<String, Decimal> {
    let mut quantities = baseline.clone();

    for transaction in transactions.iter().filter(|t| t.date <= as_of) {
        apply_transaction(&mut quantities, transaction);
    }

    quantities
}

/// Applies one transaction to a running quantity map.
pub(crate) fn apply_transaction(quantities: &mut HashMap<String, Decimal>, tx: &Transaction) {
    let balance = quantities
        .entry(tx.asset_id.clone())
        .or_insert(Decimal::ZERO);

    match tx.side.as_str() {
        TRANSACTION_SIDE_BUY => *balance += tx.quantity,
        TRANSACTION_SIDE_SELL => *balance -= tx.quantity,
        other => {
            warn!("Skipping transaction {} with unknown side '{}'", tx.id, other);
        }
    }
}
