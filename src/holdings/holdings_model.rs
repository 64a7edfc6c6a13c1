use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{QUANTITY_DECIMAL_PRECISION, WEIGHT_DECIMAL_PRECISION};

use super::holdings_errors::{HoldingError, Result};

/// Domain model for a holding ("tick"): how many units of an asset a
/// portfolio holds as of a date, with the normalized weight recorded at
/// ingestion (0 when unknown).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub asset_id: String,
    pub portfolio_id: String,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub weight: Decimal,
}

/// Database model for holdings
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub asset_id: String,
    pub portfolio_id: String,
    pub date: NaiveDate,
    pub quantity: String,
    pub weight: String,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Holding {
            id: db.id,
            asset_id: db.asset_id,
            portfolio_id: db.portfolio_id,
            date: db.date,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            weight: Decimal::from_str(&db.weight).unwrap_or_default(),
        }
    }
}

/// Input model for recording a holding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub asset_id: String,
    pub portfolio_id: String,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub weight: Decimal,
}

impl NewHolding {
    pub fn validate(&self) -> Result<()> {
        if self.quantity < Decimal::ZERO {
            return Err(HoldingError::InvalidData(
                "Quantity must be greater than or equal to 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<NewHolding> for HoldingDB {
    fn from(new: NewHolding) -> Self {
        HoldingDB {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: new.asset_id,
            portfolio_id: new.portfolio_id,
            date: new.date,
            quantity: new.quantity.round_dp(QUANTITY_DECIMAL_PRECISION).to_string(),
            weight: new.weight.round_dp(WEIGHT_DECIMAL_PRECISION).to_string(),
        }
    }
}
