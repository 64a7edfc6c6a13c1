use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::schema::transactions;

use super::transactions_errors::{Result, TransactionError};
use super::transactions_model::{NewTransaction, Transaction, TransactionDB};
use super::transactions_traits::TransactionRepositoryTrait;

/// Repository for managing transaction records in the database
pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| TransactionError::DatabaseError(e.to_string()))
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn create_pair(
        &self,
        sell: NewTransaction,
        buy: NewTransaction,
    ) -> Result<(Transaction, Transaction)> {
        sell.validate()?;
        buy.validate()?;

        let sell_db: TransactionDB = sell.into();
        let buy_db: TransactionDB = buy.into();

        let mut conn = self.conn()?;

        conn.transaction::<_, TransactionError, _>(|tx_conn| {
            let sell_row = diesel::insert_into(transactions::table)
                .values(&sell_db)
                .get_result::<TransactionDB>(tx_conn)?;

            let buy_row = diesel::insert_into(transactions::table)
                .values(&buy_db)
                .get_result::<TransactionDB>(tx_conn)?;

            Ok((sell_row.into(), buy_row.into()))
        })
    }

    fn list_for_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = self.conn()?;

        let results = transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .order((
                transactions::date.asc(),
                transactions::created_at.asc(),
                transactions::id.asc(),
            ))
            .load::<TransactionDB>(&mut conn)?;

        Ok(results.into_iter().map(Transaction::from).collect())
    }

    fn delete_all(&self) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(transactions::table).execute(&mut conn)?;

        Ok(deleted)
    }
}
