use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::{
    PORTFOLIO_COLUMN_PREFIX, PRICES_SHEET, PRICE_DATE_COLUMN, QUANTITY_DECIMAL_PRECISION,
    VALUE_DECIMAL_PRECISION, WEIGHTS_SHEET, WEIGHT_ASSET_COLUMN, WEIGHT_DATE_COLUMN,
    WEIGHT_DECIMAL_PRECISION,
};
use crate::db::{get_connection, DbPool};
use crate::portfolios::Portfolio;
use crate::schema::{assets, holdings, portfolios, prices};

use super::ingestion_errors::{IngestionError, Result};
use super::ingestion_model::{
    ImportSheet, ImportWorkbook, IngestOptions, IngestionSummary, PriceRecord, WeightRecord,
};

/// Melts the wide weights sheet (one column per portfolio) into long-form
/// records. `id_columns` are the (date, asset) identifier headers; a
/// portfolio column is any header starting with `portfolio_prefix`, and the
/// remainder of the header names the portfolio.
///
/// Weights are taken as-is: a date whose weights do not sum to 1 is not
/// normalized or rejected.
pub fn reshape_weights(
    sheet: &ImportSheet,
    id_columns: (&str, &str),
    portfolio_prefix: &str,
) -> Result<Vec<WeightRecord>> {
    let (date_column, asset_column) = id_columns;

    let date_idx = sheet.column_index(date_column).ok_or_else(|| {
        IngestionError::Format(format!(
            "Sheet '{}' is missing column '{}'",
            sheet.name, date_column
        ))
    })?;
    let asset_idx = sheet.column_index(asset_column).ok_or_else(|| {
        IngestionError::Format(format!(
            "Sheet '{}' is missing column '{}'",
            sheet.name, asset_column
        ))
    })?;

    let portfolio_columns: Vec<(usize, String)> = sheet
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            header
                .strip_prefix(portfolio_prefix)
                .map(|suffix| (idx, suffix.trim().to_string()))
        })
        .collect();

    if portfolio_columns.is_empty() {
        return Err(IngestionError::Format(format!(
            "Sheet '{}' has no '{}*' columns",
            sheet.name, portfolio_prefix
        )));
    }

    let mut records = Vec::new();
    for row in &sheet.rows {
        let date = parse_date(sheet.cell(row, date_idx), &sheet.name)?;
        let asset = sheet.cell(row, asset_idx);
        if asset.is_empty() {
            return Err(IngestionError::Format(format!(
                "Sheet '{}' has a row without an asset name",
                sheet.name
            )));
        }

        for (idx, portfolio) in &portfolio_columns {
            let cell = sheet.cell(row, *idx);
            let weight = if cell.is_empty() {
                Decimal::ZERO
            } else {
                parse_decimal(cell, &sheet.name)?
            };
            if weight < Decimal::ZERO {
                return Err(IngestionError::InvalidData(format!(
                    "Negative weight {} for asset '{}' on {}",
                    weight, asset, date
                )));
            }

            records.push(WeightRecord {
                date,
                asset: asset.to_string(),
                portfolio: portfolio.clone(),
                weight,
            });
        }
    }

    Ok(records)
}

/// Reshapes the wide prices sheet (one column per asset) into long-form
/// records, assigning each row's date its ordinal position in the batch as
/// `date_id`. An empty cell means the asset has no price on that date.
pub fn reshape_prices(sheet: &ImportSheet, date_column: &str) -> Result<Vec<PriceRecord>> {
    let date_idx = sheet.column_index(date_column).ok_or_else(|| {
        IngestionError::Format(format!(
            "Sheet '{}' is missing column '{}'",
            sheet.name, date_column
        ))
    })?;

    let asset_columns: Vec<(usize, &String)> = sheet
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != date_idx)
        .collect();

    if asset_columns.is_empty() {
        return Err(IngestionError::Format(format!(
            "Sheet '{}' has no asset columns",
            sheet.name
        )));
    }

    let mut records = Vec::new();
    for (ordinal, row) in sheet.rows.iter().enumerate() {
        let date = parse_date(sheet.cell(row, date_idx), &sheet.name)?;

        for (idx, asset) in &asset_columns {
            let cell = sheet.cell(row, *idx);
            if cell.is_empty() {
                continue;
            }
            let value = parse_decimal(cell, &sheet.name)?;
            if value < Decimal::ZERO {
                return Err(IngestionError::InvalidData(format!(
                    "Negative price {} for asset '{}' on {}",
                    value, asset, date
                )));
            }

            records.push(PriceRecord {
                date,
                date_id: ordinal as i32,
                asset: (*asset).clone(),
                value,
            });
        }
    }

    Ok(records)
}

/// Derives a portfolio's initial quantities from its weight allocation on the
/// initial date: `quantity = weight × portfolio.value / price`.
///
/// Every asset carrying a nonzero weight must have a price on that date;
/// otherwise the derivation fails naming the asset and date. Zero-weight
/// assets yield zero quantities without requiring a price.
pub fn initial_holdings(
    weights_at_date: &[WeightRecord],
    prices_at_date: &HashMap<String, Decimal>,
    portfolio: &Portfolio,
) -> Result<HashMap<String, Decimal>> {
    let mut quantities = HashMap::with_capacity(weights_at_date.len());

    for record in weights_at_date {
        if record.weight.is_zero() {
            quantities.insert(record.asset.clone(), Decimal::ZERO);
            continue;
        }

        let price = prices_at_date
            .get(&record.asset)
            .copied()
            .ok_or_else(|| IngestionError::MissingPrice {
                asset: record.asset.clone(),
                date: record.date,
            })?;
        if price.is_zero() {
            return Err(IngestionError::InvalidData(format!(
                "Zero price for asset '{}' on {}; cannot derive a quantity",
                record.asset, record.date
            )));
        }

        let quantity = record.weight * portfolio.value / price;
        quantities.insert(record.asset.clone(), quantity);
    }

    Ok(quantities)
}

/// Service ingesting a spreadsheet-like batch (wide weight matrix + wide
/// price matrix) into the store. The whole batch commits in one database
/// transaction: any error rolls everything back.
pub struct IngestionService {
    pool: Arc<DbPool>,
}

impl IngestionService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn ingest(
        &self,
        workbook: &ImportWorkbook,
        options: &IngestOptions,
    ) -> Result<IngestionSummary> {
        // Reshape both sheets before touching the database so a malformed
        // input aborts without any writes.
        let weights_sheet = workbook.sheet(WEIGHTS_SHEET)?;
        let prices_sheet = workbook.sheet(PRICES_SHEET)?;

        let weight_records = reshape_weights(
            weights_sheet,
            (WEIGHT_DATE_COLUMN, WEIGHT_ASSET_COLUMN),
            PORTFOLIO_COLUMN_PREFIX,
        )?;
        let price_records = reshape_prices(prices_sheet, PRICE_DATE_COLUMN)?;

        let initial_date = options
            .initial_date
            .or_else(|| price_records.iter().map(|p| p.date).min())
            .ok_or_else(|| {
                IngestionError::Format(format!("Sheet '{}' has no rows", PRICES_SHEET))
            })?;

        let mut conn =
            get_connection(&self.pool).map_err(|e| IngestionError::DatabaseError(e.to_string()))?;

        let summary = conn.transaction::<IngestionSummary, IngestionError, _>(|tx_conn| {
            ingest_batch(tx_conn, &weight_records, &price_records, initial_date)
        })?;

        info!(
            "Ingested batch: {} assets, {} portfolios, {} prices, {} holdings",
            summary.assets, summary.portfolios, summary.prices, summary.holdings
        );

        Ok(summary)
    }
}

fn ingest_batch(
    conn: &mut SqliteConnection,
    weight_records: &[WeightRecord],
    price_records: &[PriceRecord],
    initial_date: NaiveDate,
) -> Result<IngestionSummary> {
    let mut summary = IngestionSummary::default();

    // Assets come from the price columns, as in the source sheets.
    let mut asset_ids: HashMap<String, String> = HashMap::new();
    for record in price_records {
        if !asset_ids.contains_key(&record.asset) {
            let id = get_or_create_asset(conn, &record.asset)?;
            asset_ids.insert(record.asset.clone(), id);
        }
    }
    summary.assets = asset_ids.len();

    let mut portfolios_by_suffix: HashMap<String, Portfolio> = HashMap::new();
    for record in weight_records {
        if !portfolios_by_suffix.contains_key(&record.portfolio) {
            let name = format!("Portfolio {}", record.portfolio);
            let portfolio = upsert_portfolio(conn, &name)?;
            portfolios_by_suffix.insert(record.portfolio.clone(), portfolio);
        }
    }
    summary.portfolios = portfolios_by_suffix.len();

    for record in price_records {
        let asset_id = &asset_ids[&record.asset];
        upsert_price(conn, asset_id, record)?;
        summary.prices += 1;
    }

    let initial_prices: HashMap<String, Decimal> = price_records
        .iter()
        .filter(|p| p.date == initial_date)
        .map(|p| (p.asset.clone(), p.value))
        .collect();

    for (suffix, portfolio) in &portfolios_by_suffix {
        let at_date: Vec<WeightRecord> = weight_records
            .iter()
            .filter(|w| w.date == initial_date && w.portfolio == *suffix)
            .cloned()
            .collect();

        debug!(
            "Deriving initial holdings for '{}' on {} from {} weights",
            portfolio.name,
            initial_date,
            at_date.len()
        );

        let quantities = initial_holdings(&at_date, &initial_prices, portfolio)?;

        for record in &at_date {
            // A zero-weight asset that never appears in the prices sheet has
            // no asset row to attach a holding to; skip it.
            let Some(asset_id) = asset_ids.get(&record.asset) else {
                continue;
            };
            let quantity = quantities.get(&record.asset).copied().unwrap_or_default();
            upsert_holding(
                conn,
                asset_id,
                &portfolio.id,
                initial_date,
                quantity,
                record.weight,
            )?;
            summary.holdings += 1;
        }
    }

    Ok(summary)
}

fn get_or_create_asset(conn: &mut SqliteConnection, name: &str) -> Result<String> {
    let existing = assets::table
        .filter(assets::name.eq(name))
        .select(assets::id)
        .first::<String>(conn)
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    diesel::insert_into(assets::table)
        .values((
            assets::id.eq(&id),
            assets::name.eq(name),
            assets::created_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(conn)?;

    Ok(id)
}

fn upsert_portfolio(conn: &mut SqliteConnection, name: &str) -> Result<Portfolio> {
    use crate::portfolios::portfolios_model::PortfolioDB;

    let existing = portfolios::table
        .filter(portfolios::name.eq(name))
        .first::<PortfolioDB>(conn)
        .optional()?;

    if let Some(db) = existing {
        return Ok(db.into());
    }

    let db = PortfolioDB {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        value: crate::portfolios::DEFAULT_PORTFOLIO_VALUE.to_string(),
        created_at: chrono::Utc::now().naive_utc(),
    };
    let inserted = diesel::insert_into(portfolios::table)
        .values(&db)
        .get_result::<PortfolioDB>(conn)?;

    Ok(inserted.into())
}

fn upsert_price(conn: &mut SqliteConnection, asset_id: &str, record: &PriceRecord) -> Result<()> {
    let value = record.value.round_dp(VALUE_DECIMAL_PRECISION).to_string();

    let existing = prices::table
        .filter(prices::asset_id.eq(asset_id))
        .filter(prices::date.eq(record.date))
        .select((prices::id, prices::value, prices::date_id))
        .first::<(String, String, Option<i32>)>(conn)
        .optional()?;

    match existing {
        Some((id, current_value, current_date_id)) => {
            // Only touch rows whose values actually changed.
            if current_value != value || current_date_id != Some(record.date_id) {
                diesel::update(prices::table.filter(prices::id.eq(id)))
                    .set((
                        prices::value.eq(&value),
                        prices::date_id.eq(Some(record.date_id)),
                    ))
                    .execute(conn)?;
            }
        }
        None => {
            diesel::insert_into(prices::table)
                .values((
                    prices::id.eq(uuid::Uuid::new_v4().to_string()),
                    prices::asset_id.eq(asset_id),
                    prices::date.eq(record.date),
                    prices::date_id.eq(Some(record.date_id)),
                    prices::value.eq(&value),
                ))
                .execute(conn)?;
        }
    }

    Ok(())
}

fn upsert_holding(
    conn: &mut SqliteConnection,
    asset_id: &str,
    portfolio_id: &str,
    date: NaiveDate,
    quantity: Decimal,
    weight: Decimal,
) -> Result<()> {
    let quantity = quantity.round_dp(QUANTITY_DECIMAL_PRECISION).to_string();
    let weight = weight.round_dp(WEIGHT_DECIMAL_PRECISION).to_string();

    let existing = holdings::table
        .filter(holdings::asset_id.eq(asset_id))
        .filter(holdings::portfolio_id.eq(portfolio_id))
        .filter(holdings::date.eq(date))
        .select((holdings::id, holdings::quantity, holdings::weight))
        .first::<(String, String, String)>(conn)
        .optional()?;

    match existing {
        Some((id, current_quantity, current_weight)) => {
            if current_quantity != quantity || current_weight != weight {
                diesel::update(holdings::table.filter(holdings::id.eq(id)))
                    .set((
                        holdings::quantity.eq(&quantity),
                        holdings::weight.eq(&weight),
                    ))
                    .execute(conn)?;
            }
        }
        None => {
            diesel::insert_into(holdings::table)
                .values((
                    holdings::id.eq(uuid::Uuid::new_v4().to_string()),
                    holdings::asset_id.eq(asset_id),
                    holdings::portfolio_id.eq(portfolio_id),
                    holdings::date.eq(date),
                    holdings::quantity.eq(&quantity),
                    holdings::weight.eq(&weight),
                ))
                .execute(conn)?;
        }
    }

    Ok(())
}

fn parse_date(cell: &str, sheet: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(cell.trim(), "%Y-%m-%d").map_err(|_| {
        IngestionError::Format(format!("Sheet '{}' has an invalid date '{}'", sheet, cell))
    })
}

fn parse_decimal(cell: &str, sheet: &str) -> Result<Decimal> {
    Decimal::from_str(cell.trim()).map_err(|_| {
        IngestionError::Format(format!("Sheet '{}' has an invalid number '{}'", sheet, cell))
    })
}
