pub mod accountant;
pub mod reports;
pub mod calculation;

use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::ledger::validator::{parse_date, parse_decimal};

/// A calculator output row: the normalized transaction plus the date of the
/// lot its input leg was matched against.
#[derive(Clone, Debug, PartialEq)]
pub struct SettledRow {
    pub date: NaiveDate,
    pub note: String,
    pub input_amount: Decimal,
    pub input_currency: String,
    pub output_amount: Decimal,
    pub output_currency: String,
    pub acquisition_date: Option<NaiveDate>,
    pub profit: Option<Decimal>,
}

// Column titles of the calculator export. Only this adapter knows them.
#[derive(Debug, Deserialize)]
struct FifoRecord {
    #[serde(rename = "datum")]
    date: String,
    #[serde(rename = "početna valuta")]
    input_currency: String,
    #[serde(rename = "početni iznos", default)]
    input_amount: Option<String>,
    #[serde(rename = "završna valuta")]
    output_currency: String,
    #[serde(rename = "završni iznos", default)]
    output_amount: Option<String>,
    #[serde(rename = "datum nabave", default)]
    acquisition_date: Option<String>,
    #[serde(rename = "opis", default)]
    note: Option<String>,
    #[serde(default)]
    profit: Option<String>,
}

impl FifoRecord {
    fn into_settled(self, line: u64) -> Result<SettledRow> {
        let invalid = |what: &str, value: &str| Error::Settlement {
            line,
            message: format!("'{}' is not a valid {}", value, what),
        };
        let amount = |value: Option<String>| -> Result<Decimal> {
            match value.as_deref().map(str::trim) {
                None | Some("") => Ok(Decimal::ZERO),
                Some(v) => parse_decimal(v).ok_or_else(|| invalid("amount", v)),
            }
        };

        let date = parse_date(&self.date).ok_or_else(|| invalid("date", &self.date))?;
        let input_amount = amount(self.input_amount)?;
        let output_amount = amount(self.output_amount)?;
        let profit = match self.profit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(parse_decimal(v).ok_or_else(|| invalid("profit", v))?),
        };

        Ok(SettledRow {
            date,
            note: self.note.unwrap_or_default(),
            input_amount,
            input_currency: self.input_currency.trim().to_string(),
            output_amount,
            output_currency: self.output_currency.trim().to_string(),
            // an unreadable acquisition date cannot match any lot
            acquisition_date: self.acquisition_date.as_deref().and_then(parse_date),
            profit,
        })
    }
}

/// Reads the calculator's CSV export, keyed by its column titles.
pub fn read_settled<R: Read>(reader: R) -> Result<Vec<SettledRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.deserialize::<FifoRecord>() {
        let record = result?;
        let line = rows.len() as u64 + 2;
        rows.push(record.into_settled(line)?);
    }
    Ok(rows)
}

pub fn read_settled_file(path: &std::path::Path) -> Result<Vec<SettledRow>> {
    let file = std::fs::File::open(path)?;
    read_settled(file)
}
