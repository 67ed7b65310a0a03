use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Ledger columns checked by the row validator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LedgerField {
    Date,
    TransactionType,
    InputCurrency,
    InputAmount,
    OutputCurrency,
    OutputAmount,
    Note,
}

impl fmt::Display for LedgerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedgerField::Date => "Date",
            LedgerField::TransactionType => "Transaction Type",
            LedgerField::InputCurrency => "Input Currency",
            LedgerField::InputAmount => "Input Amount",
            LedgerField::OutputCurrency => "Output Currency",
            LedgerField::OutputAmount => "Output Amount",
            LedgerField::Note => "Note",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error("missing value in column '{field}'")]
    MissingField { field: LedgerField },
    #[error("'{value}' in column '{field}' is not a number")]
    NonNumericAmount { field: LedgerField, value: String },
    #[error("negative amount {value} in column '{field}'")]
    NegativeAmount { field: LedgerField, value: String },
    #[error("'{value}' is not a valid date")]
    InvalidDateFormat { value: String },
    #[error("date {date} is earlier than the previous row's date {previous}")]
    OutOfOrderDate { date: NaiveDate, previous: NaiveDate },
}

/// A rejected ledger row. Processing of the ledger stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("sheet '{sheet}', row #{order}: {kind}")]
pub struct ValidationError {
    pub sheet: String,
    pub order: u32,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("sheet '{sheet}', line {line}: '{value}' is not a row number")]
    InvalidOrder {
        sheet: String,
        line: u64,
        value: String,
    },
    #[error("settled ledger, line {line}: {message}")]
    Settlement { line: u64, message: String },
    #[error("{0}")]
    Arguments(String),
}
