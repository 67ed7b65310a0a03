use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Interest received on one date in one currency, minus what was spent from it.
#[derive(Clone, Debug, PartialEq)]
pub struct InterestLot {
    pub acquired: NaiveDate,
    pub currency: String,
    pub remaining: Decimal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Withdrawal {
    /// No interest lot exists for the acquisition date and currency.
    NoLot,
    /// Input equals output; tokens were moved or locked, not spent.
    Transfer,
    /// The lot holds less than requested; the tokens came from elsewhere.
    Insufficient,
    Applied,
}

/// Interest lots keyed by `(acquisition date, currency)`, in creation order.
pub struct Inventory {
    layers: Vec<InterestLot>,
    index: HashMap<(NaiveDate, String), usize>,
    currency_precision: Decimal,
}

impl Inventory {
    pub fn new(currency_precision: Decimal) -> Inventory {
        Inventory {
            layers: Vec::new(),
            index: HashMap::new(),
            currency_precision,
        }
    }

    pub fn deposit(&mut self, acquired: NaiveDate, currency: &str, amount: Decimal) {
        let layers = &mut self.layers;
        let slot = *self
            .index
            .entry((acquired, currency.to_string()))
            .or_insert_with(|| {
                layers.push(InterestLot {
                    acquired,
                    currency: currency.to_string(),
                    remaining: Decimal::ZERO,
                });
                layers.len() - 1
            });
        // saturates instead of overflowing past Decimal::MAX
        let layer = &mut self.layers[slot];
        layer.remaining = layer.remaining.saturating_add(amount);
    }

    /// Spends `amount` from the lot, unless that would take it below zero.
    /// A withdrawal is all-or-nothing.
    pub fn withdraw(
        &mut self,
        acquired: Option<NaiveDate>,
        currency: &str,
        amount: Decimal,
        output_amount: Decimal,
    ) -> Withdrawal {
        let slot = match acquired.and_then(|date| self.index.get(&(date, currency.to_string()))) {
            Some(slot) => *slot,
            None => return Withdrawal::NoLot,
        };

        if (amount - output_amount).abs() <= self.currency_precision {
            return Withdrawal::Transfer;
        }

        let layer = &mut self.layers[slot];
        let remaining = layer.remaining - amount;
        if remaining < -self.currency_precision {
            return Withdrawal::Insufficient;
        }
        layer.remaining = remaining.max(Decimal::ZERO);
        Withdrawal::Applied
    }

    pub fn remaining(&self, acquired: NaiveDate, currency: &str) -> Option<Decimal> {
        self.index
            .get(&(acquired, currency.to_string()))
            .map(|slot| self.layers[*slot].remaining)
    }

    pub fn lots(&self) -> &[InterestLot] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn deposits_accumulate_per_date_and_currency() {
        let mut inventory = Inventory::new(Decimal::ZERO);
        inventory.deposit(day(1), "ETH", dec!(1));
        inventory.deposit(day(1), "ETH", dec!(2));
        inventory.deposit(day(1), "DOT", dec!(5));
        inventory.deposit(day(2), "ETH", dec!(4));
        assert_eq!(inventory.remaining(day(1), "ETH"), Some(dec!(3)));
        assert_eq!(inventory.remaining(day(1), "DOT"), Some(dec!(5)));
        assert_eq!(inventory.remaining(day(2), "ETH"), Some(dec!(4)));
        assert_eq!(inventory.lots().len(), 3);
    }

    #[test]
    fn deposits_saturate_at_decimal_max() {
        let mut inventory = Inventory::new(Decimal::ZERO);
        inventory.deposit(day(1), "ETH", Decimal::MAX);
        inventory.deposit(day(1), "ETH", dec!(1));
        assert_eq!(inventory.remaining(day(1), "ETH"), Some(Decimal::MAX));
    }

    #[test]
    fn withdrawal_without_lot_is_ignored() {
        let mut inventory = Inventory::new(Decimal::ZERO);
        inventory.deposit(day(1), "ETH", dec!(1));
        assert_eq!(
            inventory.withdraw(Some(day(2)), "ETH", dec!(1), dec!(0)),
            Withdrawal::NoLot
        );
        assert_eq!(
            inventory.withdraw(None, "ETH", dec!(1), dec!(0)),
            Withdrawal::NoLot
        );
        assert_eq!(inventory.remaining(day(1), "ETH"), Some(dec!(1)));
    }

    #[test]
    fn overdraw_is_skipped_in_full() {
        let mut inventory = Inventory::new(Decimal::ZERO);
        inventory.deposit(day(1), "ETH", dec!(3));
        assert_eq!(
            inventory.withdraw(Some(day(1)), "ETH", dec!(3.5), dec!(100)),
            Withdrawal::Insufficient
        );
        assert_eq!(inventory.remaining(day(1), "ETH"), Some(dec!(3)));
    }

    #[test]
    fn exhausted_lot_stays_at_zero() {
        let mut inventory = Inventory::new(Decimal::ZERO);
        inventory.deposit(day(1), "ETH", dec!(3));
        assert_eq!(
            inventory.withdraw(Some(day(1)), "ETH", dec!(3), dec!(2)),
            Withdrawal::Applied
        );
        assert_eq!(inventory.remaining(day(1), "ETH"), Some(dec!(0)));
    }

    #[test]
    fn precision_absorbs_rounding_dust() {
        let mut inventory = Inventory::new(dec!(0.00000001));
        inventory.deposit(day(1), "BTC", dec!(0.1));
        assert_eq!(
            inventory.withdraw(Some(day(1)), "BTC", dec!(0.100000005), dec!(2000)),
            Withdrawal::Applied
        );
        assert_eq!(inventory.remaining(day(1), "BTC"), Some(dec!(0)));
        assert_eq!(
            inventory.withdraw(Some(day(1)), "BTC", dec!(0.5), dec!(0.500000001)),
            Withdrawal::Transfer
        );
    }
}
