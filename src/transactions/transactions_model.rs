use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{QUANTITY_DECIMAL_PRECISION, VALUE_DECIMAL_PRECISION};

use super::transactions_errors::{Result, TransactionError};

pub const TRANSACTION_SIDE_BUY: &str = "BUY";
pub const TRANSACTION_SIDE_SELL: &str = "SELL";

/// Side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionSide {
    Buy,
    Sell,
}

impl TransactionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSide::Buy => TRANSACTION_SIDE_BUY,
            TransactionSide::Sell => TRANSACTION_SIDE_SELL,
        }
    }
}

impl FromStr for TransactionSide {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            TRANSACTION_SIDE_BUY => Ok(TransactionSide::Buy),
            TRANSACTION_SIDE_SELL => Ok(TransactionSide::Sell),
            _ => Err(format!("Unknown transaction side: {}", s)),
        }
    }
}

/// Domain model for a single executed trade. Append-only: rows are never
/// mutated after creation. `created_at` plus `id` break ordering ties within
/// a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub side: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub value: Decimal,
    pub created_at: NaiveDateTime,
}

/// Database model for transactions
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub value: String,
    pub created_at: NaiveDateTime,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Transaction {
            id: db.id,
            portfolio_id: db.portfolio_id,
            asset_id: db.asset_id,
            date: db.date,
            side: db.side,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            price: Decimal::from_str(&db.price).unwrap_or_default(),
            value: Decimal::from_str(&db.value).unwrap_or_default(),
            created_at: db.created_at,
        }
    }
}

/// Input model for a single transaction row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub portfolio_id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub side: TransactionSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub value: Decimal,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.quantity < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Quantity must be greater than or equal to 0".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Price must be greater than or equal to 0".to_string(),
            ));
        }
        if self.value < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Value must be greater than or equal to 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(new: NewTransaction) -> Self {
        TransactionDB {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: new.portfolio_id,
            asset_id: new.asset_id,
            date: new.date,
            side: new.side.as_str().to_string(),
            quantity: new.quantity.round_dp(QUANTITY_DECIMAL_PRECISION).to_string(),
            price: new.price.to_string(),
            value: new.value.round_dp(VALUE_DECIMAL_PRECISION).to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

/// Request model for a sell-one-buy-another trade, as submitted by the
/// request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub portfolio_id: String,
    pub date: NaiveDate,
    pub asset_to_sell: String,
    pub asset_to_buy: String,
    pub value: Decimal,
}

impl NewTrade {
    pub fn validate(&self) -> Result<()> {
        if self.value < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Trade value must be greater than or equal to 0".to_string(),
            ));
        }
        if self.asset_to_sell == self.asset_to_buy {
            return Err(TransactionError::InvalidData(
                "Cannot sell and buy the same asset".to_string(),
            ));
        }
        Ok(())
    }
}
