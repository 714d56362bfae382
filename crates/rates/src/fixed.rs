//! Fixed exchange-rate table.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use fairshare_core::{CurrencyConverter, ExchangeRate, SettlementError, SettlementResult};
use fairshare_shared::Currency;
use rust_decimal::Decimal;

/// In-memory rate table.
///
/// A pair missing in one direction is answered from its inverse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedRates {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl FixedRates {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rate.
    pub fn insert(&mut self, rate: ExchangeRate) {
        self.rates.insert((rate.from, rate.to), rate.rate);
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with(mut self, rate: ExchangeRate) -> Self {
        self.insert(rate);
        self
    }

    /// Number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Looks a pair up directly or through its inverse.
    #[must_use]
    pub fn lookup(&self, from: Currency, to: Currency) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        if let Some(rate) = self.rates.get(&(from, to)) {
            return Some(*rate);
        }
        self.rates
            .get(&(to, from))
            .and_then(|rate| Decimal::ONE.checked_div(*rate))
    }
}

impl FromIterator<ExchangeRate> for FixedRates {
    fn from_iter<I: IntoIterator<Item = ExchangeRate>>(iter: I) -> Self {
        let mut table = Self::new();
        for rate in iter {
            table.insert(rate);
        }
        table
    }
}

/// Parses `USD/EUR=0.92,GBP/USD=1.27`.
impl FromStr for FixedRates {
    type Err = SettlementError;

    fn from_str(s: &str) -> SettlementResult<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_entry)
            .collect()
    }
}

fn parse_entry(entry: &str) -> SettlementResult<ExchangeRate> {
    let malformed = || SettlementError::InvalidAmount(format!("expected FROM/TO=RATE, got '{entry}'"));

    let (pair, rate) = entry.split_once('=').ok_or_else(malformed)?;
    let (from, to) = pair.split_once('/').ok_or_else(malformed)?;
    let rate = Decimal::from_str(rate.trim()).map_err(|_| malformed())?;

    ExchangeRate::new(
        Currency::new(from)?,
        Currency::new(to)?,
        rate,
        Utc::now(),
    )
}

#[async_trait]
impl CurrencyConverter for FixedRates {
    async fn get_rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        self.lookup(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_eur() -> ExchangeRate {
        ExchangeRate::new(Currency::USD, Currency::EUR, dec!(0.8), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_direct_and_inverse_lookup() {
        let table = FixedRates::new().with(usd_eur());

        assert_eq!(table.get_rate(Currency::USD, Currency::EUR).await, Some(dec!(0.8)));
        assert_eq!(table.get_rate(Currency::EUR, Currency::USD).await, Some(dec!(1.25)));
        assert_eq!(table.get_rate(Currency::USD, Currency::GBP).await, None);
    }

    #[test]
    fn test_same_currency_is_one() {
        assert_eq!(FixedRates::new().lookup(Currency::JPY, Currency::JPY), Some(Decimal::ONE));
    }

    #[test]
    fn test_direct_entry_wins_over_inverse() {
        let table: FixedRates = vec![
            usd_eur(),
            ExchangeRate::new(Currency::EUR, Currency::USD, dec!(1.3), Utc::now()).unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(Currency::EUR, Currency::USD), Some(dec!(1.3)));
    }

    #[test]
    fn test_parse_table() {
        let table: FixedRates = "usd/eur=0.92, GBP/USD=1.27,".parse().unwrap();

        assert_eq!(table.lookup(Currency::USD, Currency::EUR), Some(dec!(0.92)));
        assert_eq!(table.lookup(Currency::GBP, Currency::USD), Some(dec!(1.27)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "USD-EUR=0.9".parse::<FixedRates>(),
            Err(SettlementError::InvalidAmount(_))
        ));
        assert!(matches!(
            "USD/EURO=0.9".parse::<FixedRates>(),
            Err(SettlementError::InvalidCurrency(_))
        ));
        assert!(matches!(
            "USD/EUR=-1".parse::<FixedRates>(),
            Err(SettlementError::InvalidAmount(_))
        ));
        assert!("".parse::<FixedRates>().unwrap().is_empty());
    }
}
