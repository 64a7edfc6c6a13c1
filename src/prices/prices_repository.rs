use chrono::NaiveDate;
use diesel::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::schema::prices;

use super::prices_errors::{PriceError, Result};
use super::prices_model::{NewPrice, Price, PriceDB};
use super::prices_traits::{PriceRepositoryTrait, PriceSnapshot};

/// Repository for managing price records in the database
pub struct PriceRepository {
    pool: Arc<DbPool>,
}

impl PriceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| PriceError::DatabaseError(e.to_string()))
    }
}

impl PriceRepositoryTrait for PriceRepository {
    fn get_by_asset_and_date(&self, asset_id: &str, date: NaiveDate) -> Result<Price> {
        let mut conn = self.conn()?;

        let result = prices::table
            .filter(prices::asset_id.eq(asset_id))
            .filter(prices::date.eq(date))
            .first::<PriceDB>(&mut conn)?;

        Ok(result.into())
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Price>> {
        let mut conn = self.conn()?;

        let results = prices::table
            .filter(prices::date.eq(date))
            .load::<PriceDB>(&mut conn)?;

        Ok(results.into_iter().map(Price::from).collect())
    }

    fn snapshots_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HashMap<NaiveDate, PriceSnapshot>> {
        let mut conn = self.conn()?;

        let results = prices::table
            .filter(prices::date.ge(start_date))
            .filter(prices::date.le(end_date))
            .order(prices::date.asc())
            .load::<PriceDB>(&mut conn)?;

        let mut snapshots: HashMap<NaiveDate, PriceSnapshot> = HashMap::new();
        for row in results {
            let price: Price = row.into();
            snapshots
                .entry(price.date)
                .or_default()
                .insert(price.asset_id, price.value);
        }

        Ok(snapshots)
    }

    fn upsert(&self, new_price: NewPrice) -> Result<Price> {
        new_price.validate()?;

        match self.get_by_asset_and_date(&new_price.asset_id, new_price.date) {
            Ok(existing) => {
                let incoming = new_price.value.round_dp(crate::constants::VALUE_DECIMAL_PRECISION);
                if existing.value == incoming && existing.date_id == new_price.date_id {
                    return Ok(existing);
                }

                let price_db: PriceDB = new_price.into();
                let mut conn = self.conn()?;
                let result = diesel::update(prices::table.filter(prices::id.eq(&existing.id)))
                    .set((
                        prices::value.eq(&price_db.value),
                        prices::date_id.eq(price_db.date_id),
                    ))
                    .get_result::<PriceDB>(&mut conn)?;

                Ok(result.into())
            }
            Err(PriceError::NotFound(_)) => {
                let price_db: PriceDB = new_price.into();
                let mut conn = self.conn()?;
                let result = diesel::insert_into(prices::table)
                    .values(&price_db)
                    .get_result::<PriceDB>(&mut conn)?;

                Ok(result.into())
            }
            Err(e) => Err(e),
        }
    }

    fn earliest_date(&self) -> Result<Option<NaiveDate>> {
        let mut conn = self.conn()?;

        let result = prices::table
            .select(diesel::dsl::min(prices::date))
            .first::<Option<NaiveDate>>(&mut conn)?;

        Ok(result)
    }

    fn delete_all(&self) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(prices::table).execute(&mut conn)?;

        Ok(deleted)
    }
}
