use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::VALUE_DECIMAL_PRECISION;

use super::prices_errors::{PriceError, Result};

/// Domain model for the market price of one unit of an asset on a date.
/// `date_id` is the ordinal position of the date within an ingested batch,
/// not a calendar value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub date_id: Option<i32>,
    pub value: Decimal,
}

/// Database model for prices
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceDB {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub date_id: Option<i32>,
    pub value: String,
}

impl From<PriceDB> for Price {
    fn from(db: PriceDB) -> Self {
        Price {
            id: db.id,
            asset_id: db.asset_id,
            date: db.date,
            date_id: db.date_id,
            value: Decimal::from_str(&db.value).unwrap_or_default(),
        }
    }
}

/// Input model for recording a price
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrice {
    pub asset_id: String,
    pub date: NaiveDate,
    pub date_id: Option<i32>,
    pub value: Decimal,
}

impl NewPrice {
    pub fn validate(&self) -> Result<()> {
        if self.value < Decimal::ZERO {
            return Err(PriceError::InvalidData(
                "Price must be greater than or equal to 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<NewPrice> for PriceDB {
    fn from(new: NewPrice) -> Self {
        PriceDB {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: new.asset_id,
            date: new.date,
            date_id: new.date_id,
            value: new.value.round_dp(VALUE_DECIMAL_PRECISION).to_string(),
        }
    }
}
