use std::path::{Path, PathBuf};

use log::info;
use rust_decimal::Decimal;

use crate::accounting::calculation;
use crate::accounting::reports::{ProfitReport, UnspentInterestReport};
use crate::accounting::{read_settled_file, SettledRow};
use crate::config::Config;
use crate::error::Result;

pub struct Analysis {
    pub profit: ProfitReport,
    pub unspent_interest: UnspentInterestReport,
}

impl Analysis {
    /// Writes `<name>-profit.csv` and `<name>-interest.csv` and returns their paths.
    pub fn write_to_files(&self, name: &Path) -> Result<(PathBuf, PathBuf)> {
        let stem = name.to_string_lossy();
        let stem = stem.strip_suffix(".csv").unwrap_or(&stem);
        let profit_path = PathBuf::from(format!("{}-profit.csv", stem));
        let interest_path = PathBuf::from(format!("{}-interest.csv", stem));
        self.profit.write_to_file(&profit_path)?;
        self.unspent_interest.write_to_file(&interest_path)?;
        info!(
            "Reports written to {} and {}",
            profit_path.display(),
            interest_path.display()
        );
        Ok((profit_path, interest_path))
    }
}

/// Runs the settled-ledger calculations with one set of parameters.
pub struct Accountant<'a> {
    interest_marker: &'a str,
    currency_precision: Decimal,
}

impl<'a> Default for Accountant<'a> {
    fn default() -> Self {
        Accountant::new()
    }
}

impl<'a> Accountant<'a> {
    pub fn new() -> Accountant<'a> {
        Accountant {
            interest_marker: "INTEREST",
            currency_precision: Decimal::new(1, 8),
        }
    }

    pub fn from_config(config: &'a Config) -> Accountant<'a> {
        Accountant {
            interest_marker: &config.interest_marker,
            currency_precision: config.currency_precision,
        }
    }

    pub fn marker(&mut self, interest_marker: &'a str) -> &mut Accountant<'a> {
        self.interest_marker = interest_marker;
        self
    }

    pub fn precision(&mut self, precision: Decimal) -> &mut Accountant<'a> {
        self.currency_precision = precision;
        self
    }

    pub fn analyze(&self, rows: &[SettledRow]) -> Analysis {
        let profit = calculation::calculate_income_and_expenses(rows);
        let unspent_interest = calculation::calculate_unspent_interest(
            rows,
            self.interest_marker,
            self.currency_precision,
        );
        info!(
            "Analyzed {} settled rows, interest left in {} currencies",
            rows.len(),
            unspent_interest.len()
        );
        Analysis {
            profit,
            unspent_interest,
        }
    }

    pub fn analyze_file(&self, path: &Path) -> Result<Analysis> {
        let rows = read_settled_file(path)?;
        Ok(self.analyze(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::read_settled;
    use rust_decimal_macros::dec;

    const EXPORT: &str = "\
datum,opis,početni iznos,početna valuta,završni iznos,završna valuta,datum nabave,profit
2024-01-01,Nexo - REWARD,0,EUR,10,ETH,,
2024-02-01,sell,6,ETH,1,EUR,2024-01-01,-3
";

    #[test]
    fn custom_marker_is_used() {
        let rows = read_settled(EXPORT.as_bytes()).unwrap();

        let default = Accountant::new().analyze(&rows);
        assert!(default.unspent_interest.is_empty());

        let mut accountant = Accountant::new();
        accountant.marker("REWARD").precision(Decimal::ZERO);
        let analysis = accountant.analyze(&rows);
        assert_eq!(analysis.unspent_interest.get("ETH"), Some(dec!(4)));
        assert_eq!(analysis.profit.expenses, dec!(-3));
        assert_eq!(analysis.profit.income, dec!(0));
    }

    #[test]
    fn reports_are_written_next_to_each_other() {
        let rows = read_settled(EXPORT.as_bytes()).unwrap();
        let mut accountant = Accountant::new();
        accountant.marker("REWARD").precision(Decimal::ZERO);
        let analysis = accountant.analyze(&rows);

        let name = std::env::temp_dir()
            .join(format!("unspent-interest-{}.csv", std::process::id()));
        let (profit_path, interest_path) = analysis.write_to_files(&name).unwrap();
        assert!(profit_path.to_string_lossy().ends_with("-profit.csv"));
        assert!(!profit_path.to_string_lossy().contains(".csv-"));

        let profit = std::fs::read_to_string(&profit_path).unwrap();
        let interest = std::fs::read_to_string(&interest_path).unwrap();
        std::fs::remove_file(&profit_path).unwrap();
        std::fs::remove_file(&interest_path).unwrap();
        assert_eq!(profit, "kind,amount\nincome,0\nexpenses,-3\n");
        assert_eq!(interest, "currency,amount\nETH,4\n");
    }

    #[test]
    fn config_parameters_are_applied() {
        let config = Config {
            interest_marker: "REWARD".to_string(),
            ..Config::default()
        };
        let rows = read_settled(EXPORT.as_bytes()).unwrap();
        let analysis = Accountant::from_config(&config).analyze(&rows);
        assert_eq!(analysis.unspent_interest.get("ETH"), Some(dec!(4)));
    }
}
