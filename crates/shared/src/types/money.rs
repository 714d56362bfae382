//! Money type with integer minor units and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as an exact count of minor units (e.g., cents);
//! `rust_decimal::Decimal` is only used for rates and major-unit parsing.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{MoneyError, MoneyResult};

/// ISO 4217 currency code (three uppercase ASCII letters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    /// US Dollar
    pub const USD: Self = Self(*b"USD");
    /// Euro
    pub const EUR: Self = Self(*b"EUR");
    /// Pound Sterling
    pub const GBP: Self = Self(*b"GBP");
    /// Japanese Yen
    pub const JPY: Self = Self(*b"JPY");
    /// Indonesian Rupiah
    pub const IDR: Self = Self(*b"IDR");
    /// Kuwaiti Dinar
    pub const KWD: Self = Self(*b"KWD");

    /// Parses a currency code, case-insensitively.
    pub fn new(code: &str) -> MoneyResult<Self> {
        let bytes = code.trim().as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_alphabetic) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(MoneyError::InvalidCurrency(code.to_string())),
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Constructed from ASCII letters only.
        std::str::from_utf8(&self.0).unwrap_or("XXX")
    }

    /// Number of decimal places of the minor unit.
    #[must_use]
    pub fn exponent(self) -> u32 {
        match &self.0 {
            b"JPY" | b"KRW" | b"VND" | b"CLP" | b"ISK" | b"UGX" | b"XAF" | b"XOF" => 0,
            b"BHD" | b"JOD" | b"KWD" | b"OMR" | b"TND" => 3,
            _ => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.as_str().to_string()
    }
}

/// Represents a monetary amount with currency.
///
/// Immutable: every operation returns a new value. Arithmetic between two
/// values requires identical currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// The amount in the smallest currency unit (e.g., cents).
    minor_units: i64,
    /// ISO 4217 currency code.
    currency: Currency,
}

impl Money {
    /// Creates a value from an exact count of minor units.
    #[must_use]
    pub const fn of_minor_units(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::of_minor_units(0, currency)
    }

    /// Creates a value from a decimal count of minor units.
    ///
    /// Fails if the value has a fractional part or does not fit in `i64`.
    pub fn from_minor_units_decimal(amount: Decimal, currency: Currency) -> MoneyResult<Self> {
        if !amount.fract().is_zero() {
            return Err(MoneyError::InvalidAmount(format!(
                "{amount} is not a whole number of minor units"
            )));
        }
        amount
            .to_i64()
            .map(|minor| Self::of_minor_units(minor, currency))
            .ok_or_else(|| MoneyError::InvalidAmount(format!("{amount} is out of range")))
    }

    /// Creates a value from a major-unit amount (`10.00` USD = 1000 cents).
    ///
    /// Fails if the amount is more precise than the currency's minor unit.
    pub fn from_major(amount: Decimal, currency: Currency) -> MoneyResult<Self> {
        let minor = amount
            .checked_mul(Decimal::from(10_i64.pow(currency.exponent())))
            .ok_or_else(|| MoneyError::InvalidAmount(format!("{amount} is out of range")))?;
        Self::from_minor_units_decimal(minor, currency).map_err(|_| {
            MoneyError::InvalidAmount(format!(
                "{amount} has more than {} decimal places for {currency}",
                currency.exponent()
            ))
        })
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount in major units (`1000` cents = `10.00`).
    #[must_use]
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.minor_units, self.currency.exponent())
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.minor_units < 0
    }

    /// Returns `-1`, `0` or `1` following the sign of the amount.
    #[must_use]
    pub const fn signum(&self) -> i64 {
        self.minor_units.signum()
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(self, other: Self) -> MoneyResult<Self> {
        self.ensure_same_currency(other)?;
        self.minor_units
            .checked_add(other.minor_units)
            .map(|minor| Self::of_minor_units(minor, self.currency))
            .ok_or_else(|| MoneyError::InvalidAmount("addition overflow".to_string()))
    }

    /// Subtracts `other` from `self`; both must share a currency.
    pub fn checked_sub(self, other: Self) -> MoneyResult<Self> {
        self.ensure_same_currency(other)?;
        self.minor_units
            .checked_sub(other.minor_units)
            .map(|minor| Self::of_minor_units(minor, self.currency))
            .ok_or_else(|| MoneyError::InvalidAmount("subtraction overflow".to_string()))
    }

    /// Flips the sign of the amount.
    pub fn negate(self) -> MoneyResult<Self> {
        self.minor_units
            .checked_neg()
            .map(|minor| Self::of_minor_units(minor, self.currency))
            .ok_or_else(|| MoneyError::InvalidAmount("negation overflow".to_string()))
    }

    /// Returns the absolute value.
    pub fn abs(self) -> MoneyResult<Self> {
        if self.is_negative() {
            self.negate()
        } else {
            Ok(self)
        }
    }

    /// Compares two amounts of the same currency.
    pub fn compare(&self, other: &Self) -> MoneyResult<Ordering> {
        self.ensure_same_currency(*other)?;
        Ok(self.minor_units.cmp(&other.minor_units))
    }

    /// Sums amounts that must all be in `currency`.
    pub fn try_sum<I>(currency: Currency, amounts: I) -> MoneyResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::zero(currency), Self::checked_add)
    }

    /// Splits the amount into `count` parts that sum exactly to the original.
    ///
    /// The base share is the floor of `amount / count`; the remainder
    /// (always smaller than `count`) is handed out one minor unit at a time to
    /// the first entries, so position 0 is favoured first. No two entries
    /// differ by more than one minor unit.
    pub fn divide_evenly(self, count: usize) -> MoneyResult<Vec<Self>> {
        if count == 0 {
            return Err(MoneyError::InvalidAmount(
                "cannot divide into zero parts".to_string(),
            ));
        }
        let divisor = i64::try_from(count)
            .map_err(|_| MoneyError::InvalidAmount(format!("divisor {count} is out of range")))?;

        let base = self.minor_units.div_euclid(divisor);
        let remainder = self.minor_units.rem_euclid(divisor);
        let extra = usize::try_from(remainder)
            .map_err(|_| MoneyError::InvalidAmount(format!("remainder {remainder} is out of range")))?;

        Ok((0..count)
            .map(|i| {
                let minor = if i < extra { base + 1 } else { base };
                Self::of_minor_units(minor, self.currency)
            })
            .collect())
    }

    /// Converts into `target` using `rate` (1 unit of `self` = `rate` units of
    /// `target`).
    ///
    /// Rescales between the two minor-unit exponents and rounds half to even
    /// so repeated conversions carry no systematic bias.
    pub fn convert(self, rate: Decimal, target: Currency) -> MoneyResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(MoneyError::InvalidAmount(format!(
                "exchange rate must be positive, got {rate}"
            )));
        }
        let converted = self
            .to_major()
            .checked_mul(rate)
            .ok_or_else(|| MoneyError::InvalidAmount("conversion overflow".to_string()))?
            .round_dp_with_strategy(target.exponent(), RoundingStrategy::MidpointNearestEven);
        Self::from_major(converted, target)
    }

    fn ensure_same_currency(self, other: Self) -> MoneyResult<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_major(), self.currency)
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "money_props.rs"]
mod props;
