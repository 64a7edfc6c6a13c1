use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ingestion_errors::{IngestionError, Result};

/// One logical sheet of a spreadsheet-like import: a header row plus string
/// cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ImportSheet {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Parses a sheet from CSV bytes. The first record is the header row.
    pub fn from_csv(name: &str, data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self::new(name, headers, rows))
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub(crate) fn cell<'a>(&self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A spreadsheet-like import: a set of named sheets.
#[derive(Debug, Clone, Default)]
pub struct ImportWorkbook {
    sheets: Vec<ImportSheet>,
}

impl ImportWorkbook {
    pub fn new(sheets: Vec<ImportSheet>) -> Self {
        Self { sheets }
    }

    pub fn push(&mut self, sheet: ImportSheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Result<&ImportSheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| IngestionError::Format(format!("Missing required sheet '{}'", name)))
    }
}

/// Long-form weight row produced by melting the wide weights sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightRecord {
    pub date: NaiveDate,
    pub asset: String,
    pub portfolio: String,
    pub weight: Decimal,
}

/// Long-form price row produced from the wide prices sheet. `date_id` is the
/// ordinal position of the row's date within the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub date_id: i32,
    pub asset: String,
    pub value: Decimal,
}

/// Options controlling a single ingestion batch.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Date whose weight allocation seeds the initial holdings. Defaults to
    /// the earliest date in the prices sheet.
    pub initial_date: Option<NaiveDate>,
}

/// Row counts committed by a successful ingestion batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub assets: usize,
    pub portfolios: usize,
    pub prices: usize,
    pub holdings: usize,
}
