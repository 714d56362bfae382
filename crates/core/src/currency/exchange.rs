//! Exchange rate types and logic.

use chrono::{DateTime, Utc};
use fairshare_shared::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settlement::error::{SettlementError, SettlementResult};

/// Point-in-time exchange rate between two currencies.
///
/// Obtained from an external source for a single report; never cached by
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from: Currency,
    /// Target currency code.
    pub to: Currency,
    /// Exchange rate (1 from = rate to).
    pub rate: Decimal,
    /// When the rate was observed.
    pub observed_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a new exchange rate; the rate must be positive.
    pub fn new(
        from: Currency,
        to: Currency,
        rate: Decimal,
        observed_at: DateTime<Utc>,
    ) -> SettlementResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(SettlementError::InvalidAmount(format!(
                "exchange rate must be positive, got {rate}"
            )));
        }
        Ok(Self {
            from,
            to,
            rate,
            observed_at,
        })
    }

    /// Returns the inverse rate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            rate: Decimal::ONE / self.rate,
            observed_at: self.observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_must_be_positive() {
        let now = Utc::now();
        assert!(ExchangeRate::new(Currency::USD, Currency::EUR, dec!(0.92), now).is_ok());
        assert!(matches!(
            ExchangeRate::new(Currency::USD, Currency::EUR, Decimal::ZERO, now),
            Err(SettlementError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_inverse() {
        let rate = ExchangeRate::new(Currency::USD, Currency::EUR, dec!(0.5), Utc::now()).unwrap();
        let inverse = rate.inverse();
        assert_eq!(inverse.from, Currency::EUR);
        assert_eq!(inverse.to, Currency::USD);
        assert_eq!(inverse.rate, dec!(2));
    }
}
