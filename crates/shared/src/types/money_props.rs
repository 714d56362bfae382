//! Property-based tests for money arithmetic.
//!
//! - Even division sums exactly to the original amount
//! - Even division never spreads entries by more than one minor unit
//! - Conversion at rate 1 between same-exponent currencies is lossless

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{Currency, Money};

/// Strategy for amounts in minor units, including negatives and zero.
fn minor_amount() -> impl Strategy<Value = i64> {
    -10_000_000_000i64..10_000_000_000i64
}

/// Strategy for split counts (1 to 100).
fn part_count() -> impl Strategy<Value = usize> {
    1usize..100
}

/// Strategy for positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* amount and count, the parts SHALL sum to the amount.
    #[test]
    fn prop_divide_evenly_sum_invariant(amount in minor_amount(), count in part_count()) {
        let money = Money::of_minor_units(amount, Currency::USD);
        let parts = money.divide_evenly(count).unwrap();

        prop_assert_eq!(parts.len(), count);
        let sum = Money::try_sum(Currency::USD, parts).unwrap();
        prop_assert_eq!(sum, money);
    }

    /// *For any* amount and count, max - min SHALL be at most one minor unit
    /// and larger entries SHALL come first.
    #[test]
    fn prop_divide_evenly_spread(amount in minor_amount(), count in part_count()) {
        let parts = Money::of_minor_units(amount, Currency::EUR)
            .divide_evenly(count)
            .unwrap();
        let units: Vec<i64> = parts.iter().map(Money::minor_units).collect();

        let max = units.iter().copied().max().unwrap();
        let min = units.iter().copied().min().unwrap();
        prop_assert!(max - min <= 1, "spread {} too large in {:?}", max - min, units);
        prop_assert!(units.windows(2).all(|w| w[0] >= w[1]));
    }

    /// *For any* amount, converting with rate 1 to a same-exponent currency
    /// SHALL keep the minor units.
    #[test]
    fn prop_unit_rate_preserves_amount(amount in minor_amount()) {
        let converted = Money::of_minor_units(amount, Currency::USD)
            .convert(Decimal::ONE, Currency::EUR)
            .unwrap();
        prop_assert_eq!(converted.minor_units(), amount);
        prop_assert_eq!(converted.currency(), Currency::EUR);
    }

    /// *For any* amount and rate, conversion SHALL preserve the sign.
    #[test]
    fn prop_convert_preserves_sign(amount in minor_amount(), rate in positive_rate()) {
        let converted = Money::of_minor_units(amount, Currency::USD)
            .convert(rate, Currency::GBP)
            .unwrap();
        prop_assert!(converted.signum() == 0 || converted.signum() == amount.signum());
    }
}
