use log::debug;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::ledger::{LedgerRow, NormalizedRow};

/// Converts validated rows into calculator records, one for one, keeping order.
pub fn normalize(rows: &[LedgerRow], config: &Config) -> Vec<NormalizedRow> {
    rows.iter().map(|row| normalize_row(row, config)).collect()
}

pub fn normalize_row(row: &LedgerRow, config: &Config) -> NormalizedRow {
    let mut input_amount = row.input_amount;
    let mut input_currency = config.alias(&row.input_currency).to_string();
    let mut output_amount = row.output_amount;
    let mut output_currency = config.alias(&row.output_currency).to_string();
    let mut note = row.note.clone();

    if config.is_interest_type(&row.transaction_type) {
        note.push_str(" - ");
        note.push_str(&config.interest_marker);
    }

    // a trade within one currency only moves the net amount
    if input_currency == output_currency {
        debug!(
            "Row #{}: collapsing {} {} -> {} {}",
            row.order, input_amount, input_currency, output_amount, output_currency
        );
        input_amount -= output_amount;
        output_amount = Decimal::ZERO;
        output_currency = config.base_asset.clone();
    }

    if input_currency == config.placeholder_currency {
        input_amount = Decimal::ZERO;
        input_currency = config.base_asset.clone();
    }
    if output_currency == config.placeholder_currency {
        output_amount = Decimal::ZERO;
        output_currency = config.base_asset.clone();
    }

    NormalizedRow {
        date: row.date,
        note,
        input_amount,
        input_currency,
        output_amount,
        output_currency,
    }
}
