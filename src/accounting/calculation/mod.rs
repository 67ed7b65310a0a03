mod inventory;

pub use inventory::{InterestLot, Withdrawal};

use log::debug;
use rust_decimal::Decimal;

use crate::accounting::SettledRow;
use crate::accounting::calculation::inventory::Inventory;
use crate::accounting::reports::{ProfitReport, UnspentInterestReport};

pub fn calculate_unspent_interest(
    rows: &[SettledRow],
    interest_marker: &str,
    currency_precision: Decimal,
) -> UnspentInterestReport {
    let mut calculation = InterestCalculation::new(interest_marker, currency_precision);
    for (i, row) in rows.iter().enumerate() {
        debug!("Processing record #{}", i + 1);
        calculation.process_record(row);
    }
    calculation.finish()
}

/// Sums positive profit as income and negative profit as expenses.
pub fn calculate_income_and_expenses(rows: &[SettledRow]) -> ProfitReport {
    let mut report = ProfitReport::default();
    for profit in rows.iter().filter_map(|row| row.profit) {
        if profit.is_sign_positive() {
            report.income = report.income.saturating_add(profit);
        } else {
            report.expenses = report.expenses.saturating_add(profit);
        }
    }
    report
}

/// Single forward pass over a settled ledger. Debits only ever match lots
/// credited by earlier rows, so rows must arrive in date order.
pub struct InterestCalculation<'a> {
    interest_marker: &'a str,
    inventory: Inventory,
    counts: WithdrawalCounts,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WithdrawalCounts {
    pub applied: usize,
    pub transfers: usize,
    pub insufficient: usize,
    /// Debits naming an acquisition date for which no interest lot exists.
    pub unmatched: usize,
}

impl<'a> InterestCalculation<'a> {
    pub fn new(interest_marker: &'a str, currency_precision: Decimal) -> InterestCalculation<'a> {
        InterestCalculation {
            interest_marker,
            inventory: Inventory::new(currency_precision),
            counts: WithdrawalCounts::default(),
        }
    }

    pub fn process_record(&mut self, row: &SettledRow) {
        if row.note.contains(self.interest_marker) {
            debug!(
                "Interest lot {} {}: +{}",
                row.date, row.output_currency, row.output_amount
            );
            self.inventory
                .deposit(row.date, &row.output_currency, row.output_amount);
        }

        let outcome = self.inventory.withdraw(
            row.acquisition_date,
            &row.input_currency,
            row.input_amount,
            row.output_amount,
        );
        match outcome {
            Withdrawal::NoLot => {
                if row.acquisition_date.is_some() {
                    self.counts.unmatched += 1;
                }
            }
            Withdrawal::Transfer => {
                debug!(
                    "{} {} from lot {:?} moved, not spent",
                    row.input_amount, row.input_currency, row.acquisition_date
                );
                self.counts.transfers += 1;
            }
            Withdrawal::Insufficient => {
                debug!(
                    "{} {} exceeds interest lot {:?}; spent from other holdings",
                    row.input_amount, row.input_currency, row.acquisition_date
                );
                self.counts.insufficient += 1;
            }
            Withdrawal::Applied => {
                debug!(
                    "Interest lot {:?} {}: -{}",
                    row.acquisition_date, row.input_currency, row.input_amount
                );
                self.counts.applied += 1;
            }
        }
    }

    pub fn remaining(&self, acquired: chrono::NaiveDate, currency: &str) -> Option<Decimal> {
        self.inventory.remaining(acquired, currency)
    }

    pub fn counts(&self) -> WithdrawalCounts {
        self.counts
    }

    pub fn lots(&self) -> &[InterestLot] {
        self.inventory.lots()
    }

    /// Totals every lot per currency, in the order currencies were first credited.
    pub fn finish(self) -> UnspentInterestReport {
        let mut report = UnspentInterestReport::default();
        for lot in self.inventory.lots() {
            report.add(&lot.currency, lot.remaining);
        }
        report
    }
}
