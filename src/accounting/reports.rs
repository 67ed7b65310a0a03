use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Serialize)]
struct AmountRecord<'a> {
    currency: &'a str,
    amount: Decimal,
}

/// Interest still held at the end of the ledger, per currency.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnspentInterestReport {
    records: Vec<(String, Decimal)>,
}

impl UnspentInterestReport {
    pub(crate) fn add(&mut self, currency: &str, amount: Decimal) {
        match self.records.iter_mut().find(|(c, _)| c == currency) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => self.records.push((currency.to_string(), amount)),
        }
    }

    pub fn get(&self, currency: &str) -> Option<Decimal> {
        self.records
            .iter()
            .find(|(c, _)| c == currency)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.records
            .iter()
            .map(|(currency, amount)| (currency.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        for (currency, amount) in self.iter() {
            writer.serialize(AmountRecord {
                currency,
                amount: amount.normalize(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

impl fmt::Display for UnspentInterestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unspent tokens earned from interest:")?;
        for (currency, amount) in self.iter() {
            writeln!(f, "  {}: {}", currency, amount.normalize())?;
        }
        Ok(())
    }
}

/// Realized gains and losses from the calculator's `profit` column.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProfitReport {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl ProfitReport {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(&["kind", "amount"])?;
        writer.write_record(&["income", self.income.normalize().to_string().as_str()])?;
        writer.write_record(&["expenses", self.expenses.normalize().to_string().as_str()])?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

impl fmt::Display for ProfitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Income: {}", self.income.normalize())?;
        writeln!(f, "Expenses: {}", self.expenses.normalize())
    }
}
