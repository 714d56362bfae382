//! Currency conversion of balance reports.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round to the target currency's minor unit
//! - Use banker's rounding (round half to even)
//! - Keep the base-currency figures alongside the converted ones

use fairshare_shared::Currency;
use rust_decimal::Decimal;

use crate::ledger::Balances;
use crate::settlement::error::SettlementResult;

/// Converts every balance with the same rate.
///
/// Each member is rounded independently, so converted balances may no longer
/// net to exactly zero; the base-currency balances remain authoritative.
pub fn convert_balances(balances: &Balances, rate: Decimal, target: Currency) -> SettlementResult<Balances> {
    balances
        .iter()
        .map(|(member, money)| -> SettlementResult<_> { Ok((*member, money.convert(rate, target)?)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairshare_shared::{MemberId, Money};
    use rust_decimal_macros::dec;

    fn usd(minor: i64) -> Money {
        Money::of_minor_units(minor, Currency::USD)
    }

    #[test]
    fn test_convert_balances() {
        let balances: Balances = [(MemberId(1), usd(666)), (MemberId(2), usd(-333)), (MemberId(3), usd(-333))]
            .into_iter()
            .collect();

        let converted = convert_balances(&balances, dec!(0.9), Currency::EUR).unwrap();

        // 6.66 * 0.9 = 5.994 -> 5.99 ; -3.33 * 0.9 = -2.997 -> -3.00
        assert_eq!(converted[&MemberId(1)], Money::of_minor_units(599, Currency::EUR));
        assert_eq!(converted[&MemberId(2)], Money::of_minor_units(-300, Currency::EUR));
        assert_eq!(converted[&MemberId(3)], Money::of_minor_units(-300, Currency::EUR));
    }

    #[test]
    fn test_bankers_rounding_on_midpoint() {
        let balances: Balances = [(MemberId(1), usd(1)), (MemberId(2), usd(3))].into_iter().collect();

        let converted = convert_balances(&balances, dec!(0.5), Currency::EUR).unwrap();

        // 0.005 -> 0.00 and 0.015 -> 0.02 (nearest even)
        assert_eq!(converted[&MemberId(1)].minor_units(), 0);
        assert_eq!(converted[&MemberId(2)].minor_units(), 2);
    }

    #[test]
    fn test_invalid_rate() {
        let balances: Balances = [(MemberId(1), usd(1))].into_iter().collect();
        assert!(convert_balances(&balances, Decimal::ZERO, Currency::EUR).is_err());
    }
}
