use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use crate::constants::{QUANTITY_DECIMAL_PRECISION, WEIGHT_DECIMAL_PRECISION};
use crate::db::{get_connection, DbPool};
use crate::schema::holdings;

use super::holdings_errors::{HoldingError, Result};
use super::holdings_model::{Holding, HoldingDB, NewHolding};
use super::holdings_traits::HoldingRepositoryTrait;

/// Repository for managing holding records in the database
pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| HoldingError::DatabaseError(e.to_string()))
    }

    fn get_by_key(
        &self,
        asset_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<Holding> {
        let mut conn = self.conn()?;

        let result = holdings::table
            .filter(holdings::asset_id.eq(asset_id))
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::date.eq(date))
            .first::<HoldingDB>(&mut conn)?;

        Ok(result.into())
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn get_baseline(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let mut conn = self.conn()?;

        let earliest = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .select(diesel::dsl::min(holdings::date))
            .first::<Option<NaiveDate>>(&mut conn)?;

        let Some(date) = earliest else {
            return Ok(Vec::new());
        };

        let results = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::date.eq(date))
            .load::<HoldingDB>(&mut conn)?;

        Ok(results.into_iter().map(Holding::from).collect())
    }

    fn list_for_portfolio_at(&self, portfolio_id: &str, date: NaiveDate) -> Result<Vec<Holding>> {
        let mut conn = self.conn()?;

        let results = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::date.eq(date))
            .load::<HoldingDB>(&mut conn)?;

        Ok(results.into_iter().map(Holding::from).collect())
    }

    fn upsert(&self, new_holding: NewHolding) -> Result<Holding> {
        new_holding.validate()?;

        match self.get_by_key(
            &new_holding.asset_id,
            &new_holding.portfolio_id,
            new_holding.date,
        ) {
            Ok(existing) => {
                let quantity = new_holding.quantity.round_dp(QUANTITY_DECIMAL_PRECISION);
                let weight = new_holding.weight.round_dp(WEIGHT_DECIMAL_PRECISION);
                if existing.quantity == quantity && existing.weight == weight {
                    return Ok(existing);
                }

                let mut conn = self.conn()?;
                let result = diesel::update(holdings::table.filter(holdings::id.eq(&existing.id)))
                    .set((
                        holdings::quantity.eq(quantity.to_string()),
                        holdings::weight.eq(weight.to_string()),
                    ))
                    .get_result::<HoldingDB>(&mut conn)?;

                Ok(result.into())
            }
            Err(HoldingError::NotFound(_)) => {
                let holding_db: HoldingDB = new_holding.into();
                let mut conn = self.conn()?;
                let result = diesel::insert_into(holdings::table)
                    .values(&holding_db)
                    .get_result::<HoldingDB>(&mut conn)?;

                Ok(result.into())
            }
            Err(e) => Err(e),
        }
    }
}
