//! Normalizes a personal crypto/fiat ledger for an external FIFO cost-basis
//! calculator and reconciles how much interest income was never spent.

pub mod accounting;
pub mod app;
pub mod config;
pub mod error;
pub mod ledger;
pub mod parser;

pub use crate::accounting::accountant::{Accountant, Analysis};
pub use crate::accounting::calculation::{
    calculate_income_and_expenses, calculate_unspent_interest, InterestCalculation,
};
pub use crate::accounting::reports::{ProfitReport, UnspentInterestReport};
pub use crate::accounting::{read_settled, SettledRow};
pub use crate::config::Config;
pub use crate::error::{Error, LedgerField, Result, ValidationError, ValidationErrorKind};
pub use crate::ledger::{Ledger, LedgerRow, NormalizedRow, RawLedgerRow, Sheet};
