//! Per-member net balances within a group.
//!
//! Sign convention: a positive balance means the group owes the member
//! (net creditor), a negative balance means the member owes the group.

use std::collections::{BTreeMap, HashMap};

use fairshare_shared::{Currency, ExpenseId, MemberId, Money};
use tracing::debug;

use super::types::{Expense, Share};
use crate::settlement::error::{SettlementError, SettlementResult};

/// Net balance per member, ordered by member id.
pub type Balances = BTreeMap<MemberId, Money>;

/// Tracks the single currency a group's rows must share.
#[derive(Debug, Default)]
struct CurrencyGuard(Option<Currency>);

impl CurrencyGuard {
    fn check(&mut self, money: Money) -> SettlementResult<()> {
        match self.0 {
            None => {
                self.0 = Some(money.currency());
                Ok(())
            }
            Some(left) if left == money.currency() => Ok(()),
            Some(left) => Err(SettlementError::CurrencyMismatch {
                left,
                right: money.currency(),
            }),
        }
    }
}

/// Computes net balances from a group's shares.
///
/// Each unsettled share is subtracted from the owing member and credited to
/// the payer of its expense. Settled shares move nothing, but every member
/// that appears on a share (and every payer) gets an entry, possibly zero.
pub fn compute_balances(
    shares: &[Share],
    expenses: &HashMap<ExpenseId, Expense>,
) -> SettlementResult<Balances> {
    let mut guard = CurrencyGuard::default();
    let mut balances = Balances::new();

    for share in shares {
        let expense = expenses
            .get(&share.expense_id())
            .ok_or(SettlementError::UnknownExpense(share.expense_id()))?;
        let amount = share.amount();
        guard.check(amount)?;
        guard.check(expense.amount)?;

        let zero = Money::zero(amount.currency());
        balances.entry(share.member_id()).or_insert(zero);
        balances.entry(expense.payer_id).or_insert(zero);

        if share.is_settled() {
            continue;
        }

        if let Some(ower) = balances.get_mut(&share.member_id()) {
            *ower = ower.checked_sub(amount)?;
        }
        if let Some(payer) = balances.get_mut(&expense.payer_id) {
            *payer = payer.checked_add(amount)?;
        }
    }

    debug!(
        shares = shares.len(),
        members = balances.len(),
        "Computed group balances"
    );
    Ok(balances)
}

/// Sums every expense amount in the group, `None` for a group with no expenses.
pub fn group_total(expenses: &HashMap<ExpenseId, Expense>) -> SettlementResult<Option<Money>> {
    let mut guard = CurrencyGuard::default();
    let mut total: Option<Money> = None;

    for expense in expenses.values() {
        guard.check(expense.amount)?;
        total = Some(match total {
            None => expense.amount,
            Some(sum) => sum.checked_add(expense.amount)?,
        });
    }

    Ok(total)
}

/// Returns the common currency of a balance map after checking every entry
/// agrees, `None` for an empty map.
pub fn balance_currency(balances: &Balances) -> SettlementResult<Option<Currency>> {
    let mut guard = CurrencyGuard::default();
    for money in balances.values() {
        guard.check(*money)?;
    }
    Ok(guard.0)
}
