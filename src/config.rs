use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_asset: String,
    pub placeholder_currency: String,
    pub interest_types: Vec<String>,
    pub interest_marker: String,
    pub currency_aliases: HashMap<String, String>,
    pub currency_precision: Decimal,
}

impl Default for Config {
    fn default() -> Config {
        let mut currency_aliases = HashMap::new();
        currency_aliases.insert("EURO (fiat)".to_string(), "EUR".to_string());
        currency_aliases.insert("USD (fiat)".to_string(), "USD".to_string());

        Config {
            base_asset: "EUR".to_string(),
            placeholder_currency: "EMPTY".to_string(),
            interest_types: vec!["Interest".to_string(), "Staking Rewards".to_string()],
            interest_marker: "INTEREST".to_string(),
            currency_aliases,
            currency_precision: Decimal::new(1, 8),
        }
    }
}

impl Config {
    pub fn new(config_path: &str) -> Result<Config> {
        let file = std::fs::File::open(config_path)?;
        let config: Config = ::serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations under which normalization would not be stable.
    pub fn validate(&self) -> Result<()> {
        if let Some((alias, target)) = self
            .currency_aliases
            .iter()
            .find(|(_, target)| self.currency_aliases.contains_key(target.as_str()))
        {
            return Err(Error::Config(format!(
                "alias '{}' maps to '{}', which is itself an alias",
                alias, target
            )));
        }
        if self.currency_precision.is_sign_negative() {
            return Err(Error::Config(format!(
                "currency_precision must not be negative, got {}",
                self.currency_precision
            )));
        }
        if self.interest_marker.trim().is_empty() {
            return Err(Error::Config("interest_marker must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn is_interest_type(&self, transaction_type: &str) -> bool {
        self.interest_types.iter().any(|t| t == transaction_type)
    }

    pub fn alias<'a>(&'a self, currency: &'a str) -> &'a str {
        self.currency_aliases
            .get(currency)
            .map(String::as_str)
            .unwrap_or(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: Config = serde_yaml::from_str("base_asset: USD\n").unwrap();
        assert_eq!(config.base_asset, "USD");
        assert_eq!(config.interest_marker, "INTEREST");
        assert_eq!(config.alias("EURO (fiat)"), "EUR");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn precision_is_read_from_yaml() {
        let config: Config = serde_yaml::from_str("currency_precision: \"0.01\"\n").unwrap();
        assert_eq!(config.currency_precision, Decimal::new(1, 2));
    }

    #[test]
    fn chained_aliases_are_rejected() {
        let mut config = Config::default();
        config
            .currency_aliases
            .insert("EUR".to_string(), "EURO".to_string());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn unmapped_currency_passes_through() {
        let config = Config::default();
        assert_eq!(config.alias("BTC"), "BTC");
        assert!(config.is_interest_type("Staking Rewards"));
        assert!(!config.is_interest_type("Trade"));
    }
}
