use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::VALUE_DECIMAL_PRECISION;

use super::portfolios_errors::{PortfolioError, Result};

/// Default notional capital assigned to a portfolio created without a value.
pub const DEFAULT_PORTFOLIO_VALUE: &str = "1000000000";

/// Domain model for a portfolio. `value` is the notional capital used as the
/// baseline when deriving initial quantities from weights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub value: Decimal,
    pub created_at: NaiveDateTime,
}

/// Database model for portfolios
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub name: String,
    pub value: String,
    pub created_at: NaiveDateTime,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Portfolio {
            id: db.id,
            name: db.name,
            value: Decimal::from_str(&db.value).unwrap_or_default(),
            created_at: db.created_at,
        }
    }
}

/// Input model for creating a new portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub name: String,
    pub value: Option<Decimal>,
}

impl NewPortfolio {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "Portfolio name cannot be empty".to_string(),
            ));
        }
        if let Some(value) = self.value {
            if value < Decimal::ZERO {
                return Err(PortfolioError::InvalidData(
                    "Portfolio value must be greater than or equal to 0".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl From<NewPortfolio> for PortfolioDB {
    fn from(new: NewPortfolio) -> Self {
        PortfolioDB {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            value: new
                .value
                .map(|v| v.round_dp(VALUE_DECIMAL_PRECISION).to_string())
                .unwrap_or_else(|| DEFAULT_PORTFOLIO_VALUE.to_string()),
            created_at: Utc::now().naive_utc(),
        }
    }
}
