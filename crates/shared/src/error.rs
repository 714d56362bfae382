//! Value-level error types shared by every crate.

use thiserror::Error;

use crate::types::money::Currency;

/// Result type alias using `MoneyError`.
pub type MoneyResult<T> = Result<T, MoneyError>;

/// Errors raised while constructing or combining money values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount, divisor or rate is not acceptable (non-integral, out of range,
    /// non-positive where a positive value is required).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic attempted across two different currencies.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),
}

impl MoneyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }

    /// Money errors are deterministic validation failures.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
