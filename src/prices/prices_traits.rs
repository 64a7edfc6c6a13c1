use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::prices_errors::Result;
use super::prices_model::{NewPrice, Price};

/// A per-date price snapshot: asset id -> unit price.
pub type PriceSnapshot = HashMap<String, Decimal>;

/// Trait defining the contract for Price repository operations.
pub trait PriceRepositoryTrait: Send + Sync {
    fn get_by_asset_and_date(&self, asset_id: &str, date: NaiveDate) -> Result<Price>;
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Price>>;
    /// Prices for the inclusive date range, grouped into one snapshot per date.
    fn snapshots_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HashMap<NaiveDate, PriceSnapshot>>;
    /// Create-if-absent; when the (asset, date) pair exists, the row is
    /// updated only if the value or date_id differ.
    fn upsert(&self, new_price: NewPrice) -> Result<Price>;
    fn earliest_date(&self) -> Result<Option<NaiveDate>>;
    fn delete_all(&self) -> Result<usize>;
}
