pub mod normalizer;
pub mod validator;

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;

/// One spreadsheet line as exported, before any checks. Empty cells are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawLedgerRow {
    pub order: u32,
    pub date: Option<String>,
    pub transaction_type: Option<String>,
    pub input_currency: Option<String>,
    pub input_amount: Option<String>,
    pub output_currency: Option<String>,
    pub output_amount: Option<String>,
    pub note: Option<String>,
}

/// A row that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerRow {
    pub order: u32,
    pub date: NaiveDate,
    pub transaction_type: String,
    pub input_amount: Decimal,
    pub input_currency: String,
    pub output_amount: Decimal,
    pub output_currency: String,
    pub note: String,
}

/// The six-field record handed to the cost-basis calculator.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub date: NaiveDate,
    pub note: String,
    pub input_amount: Decimal,
    pub input_currency: String,
    pub output_amount: Decimal,
    pub output_currency: String,
}

/// Rows read from one sheet of the ledger workbook.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawLedgerRow>,
}

/// Normalized rows of all sheets, concatenated in sheet order.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    pub rows: Vec<NormalizedRow>,
}

impl Ledger {
    pub fn from_sheets(sheets: &[Sheet], config: &Config) -> Result<Ledger> {
        let mut rows = Vec::new();
        for sheet in sheets {
            let validated = validator::validate_sheet(&sheet.name, &sheet.rows)?;
            let normalized = normalizer::normalize(&validated, config);
            info!(
                "Sheet '{}': {} rows validated and normalized",
                sheet.name,
                normalized.len()
            );
            rows.extend(normalized);
        }
        Ok(Ledger { rows })
    }
}
