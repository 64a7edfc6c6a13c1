use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day's valuation of a portfolio: total value plus the weight of each
/// priced asset, keyed by asset name. Serializes to the tabular shape the
/// request layer exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRecord {
    pub date: NaiveDate,
    pub portfolio_id: String,
    pub value: Decimal,
    pub weights: HashMap<String, Decimal>,
}

/// Plain immutable value object: the quantity of one asset held by one
/// portfolio, decoupled from any persisted row shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub asset_id: String,
    pub portfolio_id: String,
    pub quantity: Decimal,
}
