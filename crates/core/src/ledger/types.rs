//! Domain types for expenses, shares and settle-up transfers.

use chrono::{DateTime, Utc};
use fairshare_shared::{ExpenseId, GroupId, MemberId, Money};
use serde::{Deserialize, Serialize};

use crate::settlement::error::{SettlementError, SettlementResult};

/// An expense logged by one group member on behalf of the group.
///
/// Created by the orchestrating collaborator; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Group the expense belongs to.
    pub group_id: GroupId,
    /// Member who paid.
    pub payer_id: MemberId,
    /// Amount paid, strictly positive.
    pub amount: Money,
    /// Free-form description.
    pub description: String,
    /// When the money was spent.
    pub spent_on: DateTime<Utc>,
}

impl Expense {
    /// Creates a validated expense.
    pub fn new(
        id: ExpenseId,
        group_id: GroupId,
        payer_id: MemberId,
        amount: Money,
        description: impl Into<String>,
        spent_on: DateTime<Utc>,
    ) -> SettlementResult<Self> {
        let expense = Self {
            id,
            group_id,
            payer_id,
            amount,
            description: description.into(),
            spent_on,
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Checks that the amount is strictly positive.
    pub fn validate(&self) -> SettlementResult<()> {
        if self.amount.is_positive() {
            Ok(())
        } else {
            Err(SettlementError::InvalidAmount(format!(
                "expense amount must be positive, got {}",
                self.amount
            )))
        }
    }
}

/// One member's portion of one expense.
///
/// The amount is fixed at allocation time; only the settled flag may change
/// afterwards (the "mark paid" action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    expense_id: ExpenseId,
    member_id: MemberId,
    amount: Money,
    settled: bool,
}

impl Share {
    /// Creates a share row (allocation output or a row read back from storage).
    #[must_use]
    pub const fn new(expense_id: ExpenseId, member_id: MemberId, amount: Money, settled: bool) -> Self {
        Self {
            expense_id,
            member_id,
            amount,
            settled,
        }
    }

    /// Owning expense.
    #[must_use]
    pub const fn expense_id(&self) -> ExpenseId {
        self.expense_id
    }

    /// Owing member.
    #[must_use]
    pub const fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Amount owed.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Whether the share has been paid.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    /// Marks the share as paid.
    pub fn mark_settled(&mut self) {
        self.settled = true;
    }

    /// Reopens a paid share.
    pub fn mark_unsettled(&mut self) {
        self.settled = false;
    }
}

/// A suggested settle-up payment between two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Member paying (a debtor).
    pub from: MemberId,
    /// Member receiving (a creditor).
    pub to: MemberId,
    /// Amount to pay.
    pub amount: Money,
}

impl std::fmt::Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}
