//! Exchange-rate source contract.
//!
//! The engine depends on this trait, never on a concrete client. An
//! implementation answers `None` for anything it cannot deliver (transport
//! error, non-2xx response, malformed payload, unknown pair); the engine
//! never observes a transport failure directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fairshare_shared::Currency;
use rust_decimal::Decimal;
use tracing::warn;

/// Source of live exchange rates.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    /// Returns how many `to` units one `from` unit buys, or `None` when the
    /// rate is unavailable.
    async fn get_rate(&self, from: Currency, to: Currency) -> Option<Decimal>;
}

#[async_trait]
impl<T> CurrencyConverter for Arc<T>
where
    T: CurrencyConverter + ?Sized,
{
    async fn get_rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        (**self).get_rate(from, to).await
    }
}

/// Converter that never has a rate. Reports fall back to base currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRates;

#[async_trait]
impl CurrencyConverter for NoRates {
    async fn get_rate(&self, _from: Currency, _to: Currency) -> Option<Decimal> {
        None
    }
}

/// Looks up a rate, giving up after `deadline`.
///
/// Timeouts and non-positive rates are treated exactly like `None`. No
/// retries happen here; that policy belongs to the converter.
pub async fn rate_with_deadline(
    converter: &dyn CurrencyConverter,
    from: Currency,
    to: Currency,
    deadline: Duration,
) -> Option<Decimal> {
    match tokio::time::timeout(deadline, converter.get_rate(from, to)).await {
        Ok(Some(rate)) if rate > Decimal::ZERO => Some(rate),
        Ok(Some(rate)) => {
            warn!(%from, %to, %rate, "Ignoring non-positive exchange rate");
            None
        }
        Ok(None) => {
            warn!(%from, %to, "Exchange rate unavailable");
            None
        }
        Err(_) => {
            warn!(
                %from,
                %to,
                deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                "Exchange rate lookup timed out"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Fixed(Option<Decimal>);

    #[async_trait]
    impl CurrencyConverter for Fixed {
        async fn get_rate(&self, _from: Currency, _to: Currency) -> Option<Decimal> {
            self.0
        }
    }

    struct Slow;

    #[async_trait]
    impl CurrencyConverter for Slow {
        async fn get_rate(&self, _from: Currency, _to: Currency) -> Option<Decimal> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Some(dec!(0.9))
        }
    }

    const DEADLINE: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_rate_passes_through() {
        let rate = rate_with_deadline(&Fixed(Some(dec!(0.92))), Currency::USD, Currency::EUR, DEADLINE).await;
        assert_eq!(rate, Some(dec!(0.92)));
    }

    #[tokio::test]
    async fn test_missing_rate_is_none() {
        let rate = rate_with_deadline(&Fixed(None), Currency::USD, Currency::EUR, DEADLINE).await;
        assert_eq!(rate, None);
        let rate = rate_with_deadline(&NoRates, Currency::USD, Currency::EUR, DEADLINE).await;
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_none() {
        let rate = rate_with_deadline(&Fixed(Some(dec!(0))), Currency::USD, Currency::EUR, DEADLINE).await;
        assert_eq!(rate, None);
        let rate = rate_with_deadline(&Fixed(Some(dec!(-1))), Currency::USD, Currency::EUR, DEADLINE).await;
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn test_timeout_is_none() {
        let rate = rate_with_deadline(&Slow, Currency::USD, Currency::EUR, DEADLINE).await;
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn test_arc_delegates() {
        let shared: Arc<dyn CurrencyConverter> = Arc::new(Fixed(Some(dec!(2))));
        let rate = rate_with_deadline(&shared, Currency::USD, Currency::GBP, DEADLINE).await;
        assert_eq!(rate, Some(dec!(2)));
    }
}
