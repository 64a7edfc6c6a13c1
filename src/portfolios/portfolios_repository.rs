use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::VALUE_DECIMAL_PRECISION;
use crate::db::{get_connection, DbPool};
use crate::schema::portfolios;

use super::portfolios_errors::{PortfolioError, Result};
use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDB};
use super::portfolios_traits::PortfolioRepositoryTrait;

/// Repository for managing portfolio records in the database
pub struct PortfolioRepository {
    pool: Arc<DbPool>,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        let portfolio_db: PortfolioDB = new_portfolio.into();

        let mut conn = self.conn()?;

        let result = diesel::insert_into(portfolios::table)
            .values(&portfolio_db)
            .get_result::<PortfolioDB>(&mut conn)?;

        Ok(result.into())
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = self.conn()?;

        let result = portfolios::table
            .find(portfolio_id)
            .first::<PortfolioDB>(&mut conn)?;

        Ok(result.into())
    }

    fn get_by_name(&self, name: &str) -> Result<Portfolio> {
        let mut conn = self.conn()?;

        let result = portfolios::table
            .filter(portfolios::name.eq(name))
            .first::<PortfolioDB>(&mut conn)?;

        Ok(result.into())
    }

    fn upsert(&self, name: &str, value: Option<Decimal>) -> Result<Portfolio> {
        match self.get_by_name(name) {
            Ok(existing) => {
                // Update only when a different value is supplied.
                match value {
                    Some(v) if v.round_dp(VALUE_DECIMAL_PRECISION) != existing.value => {
                        let new_portfolio = NewPortfolio {
                            name: name.to_string(),
                            value: Some(v),
                        };
                        new_portfolio.validate()?;

                        let mut conn = self.conn()?;
                        let result = diesel::update(
                            portfolios::table.filter(portfolios::id.eq(&existing.id)),
                        )
                        .set(portfolios::value.eq(v.round_dp(VALUE_DECIMAL_PRECISION).to_string()))
                        .get_result::<PortfolioDB>(&mut conn)?;

                        Ok(result.into())
                    }
                    _ => Ok(existing),
                }
            }
            Err(PortfolioError::NotFound(_)) => self.create(NewPortfolio {
                name: name.to_string(),
                value,
            }),
            Err(e) => Err(e),
        }
    }

    fn list(&self) -> Result<Vec<Portfolio>> {
        let mut conn = self.conn()?;

        let results = portfolios::table
            .order(portfolios::name.asc())
            .load::<PortfolioDB>(&mut conn)?;

        Ok(results.into_iter().map(Portfolio::from).collect())
    }
}
