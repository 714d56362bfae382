//! Settlement engine error types.
//!
//! Every error here is a local, synchronous, deterministic validation
//! failure. None of them is retryable. Exchange-rate failures are not errors
//! at all; they degrade the report to `ConversionStatus::Unavailable`.

use fairshare_shared::{Currency, ExpenseId, MemberId, Money, MoneyError};
use thiserror::Error;

/// Result type alias using `SettlementError`.
pub type SettlementResult<T> = Result<T, SettlementError>;

/// Errors that can occur during allocation and balance computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    // ========== Money Errors ==========
    /// Non-positive or non-integral money value, or non-positive rate/divisor.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic across differing currencies.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency already in use.
        left: Currency,
        /// Conflicting currency.
        right: Currency,
    },

    /// Currency code could not be parsed.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    // ========== Allocation Errors ==========
    /// Allocation requested with zero members.
    #[error("Cannot allocate an expense across an empty member list")]
    EmptyGroup,

    /// Payer id absent from the member list.
    #[error("Payer {0} is not a member of the group")]
    PayerNotMember(MemberId),

    /// Member id listed more than once.
    #[error("Member {0} appears more than once in the member list")]
    DuplicateMember(MemberId),

    // ========== Ledger Errors ==========
    /// Share references an expense that was not supplied.
    #[error("Share references unknown expense {0}")]
    UnknownExpense(ExpenseId),

    /// Balances handed to settle-up do not net to zero.
    #[error("Balances do not net to zero (residual {0})")]
    UnbalancedLedger(Money),
}

impl From<MoneyError> for SettlementError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            MoneyError::CurrencyMismatch { left, right } => Self::CurrencyMismatch { left, right },
            MoneyError::InvalidCurrency(code) => Self::InvalidCurrency(code),
        }
    }
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::EmptyGroup => "EMPTY_GROUP",
            Self::PayerNotMember(_) => "PAYER_NOT_MEMBER",
            Self::DuplicateMember(_) => "DUPLICATE_MEMBER",
            Self::UnknownExpense(_) => "UNKNOWN_EXPENSE",
            Self::UnbalancedLedger(_) => "UNBALANCED_LEDGER",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - caller supplied invalid input
            Self::InvalidAmount(_)
            | Self::CurrencyMismatch { .. }
            | Self::InvalidCurrency(_)
            | Self::EmptyGroup
            | Self::PayerNotMember(_)
            | Self::DuplicateMember(_) => 400,

            // 422 Unprocessable Entity - stored data is inconsistent
            Self::UnknownExpense(_) | Self::UnbalancedLedger(_) => 422,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
