//! Splits an expense into per-member shares.
//!
//! Shares are equal up to one minor unit and always sum exactly to the
//! expense amount. The remainder goes to the earliest members in the order
//! supplied, so callers must pass a stable ordering (ascending member id)
//! for repeated allocations to be reproducible.

use std::collections::{BTreeSet, HashSet};

use fairshare_shared::MemberId;
use tracing::debug;

use crate::ledger::types::{Expense, Share};
use crate::settlement::error::{SettlementError, SettlementResult};

/// Allocation utility for splitting expenses equally.
pub struct Allocator;

impl Allocator {
    /// Allocates `expense` equally across `member_ids`, in the given order.
    ///
    /// The payer's share is returned already settled; every other share is
    /// open. Nothing is persisted here.
    ///
    /// # Errors
    ///
    /// - `EmptyGroup` if `member_ids` is empty
    /// - `DuplicateMember` if an id appears twice
    /// - `PayerNotMember` if the payer is not listed
    /// - `InvalidAmount` if the expense amount is negative
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use fairshare_core::allocation::Allocator;
    /// use fairshare_core::ledger::Expense;
    /// use fairshare_shared::{Currency, ExpenseId, GroupId, MemberId, Money};
    ///
    /// let expense = Expense::new(
    ///     ExpenseId(1),
    ///     GroupId(1),
    ///     MemberId(1),
    ///     Money::of_minor_units(1000, Currency::USD),
    ///     "Dinner",
    ///     Utc::now(),
    /// )
    /// .unwrap();
    ///
    /// let shares = Allocator::allocate(&expense, &[MemberId(1), MemberId(2), MemberId(3)]).unwrap();
    /// let owed: Vec<i64> = shares.iter().map(|s| s.amount().minor_units()).collect();
    /// assert_eq!(owed, vec![334, 333, 333]);
    /// ```
    pub fn allocate(expense: &Expense, member_ids: &[MemberId]) -> SettlementResult<Vec<Share>> {
        if member_ids.is_empty() {
            return Err(SettlementError::EmptyGroup);
        }

        let mut seen = HashSet::with_capacity(member_ids.len());
        for member in member_ids {
            if !seen.insert(*member) {
                return Err(SettlementError::DuplicateMember(*member));
            }
        }
        if !seen.contains(&expense.payer_id) {
            return Err(SettlementError::PayerNotMember(expense.payer_id));
        }
        if expense.amount.is_negative() {
            return Err(SettlementError::InvalidAmount(format!(
                "cannot allocate negative amount {}",
                expense.amount
            )));
        }

        let parts = expense.amount.divide_evenly(member_ids.len())?;
        let shares: Vec<Share> = member_ids
            .iter()
            .zip(parts)
            .map(|(&member, amount)| {
                Share::new(expense.id, member, amount, member == expense.payer_id)
            })
            .collect();

        debug!(
            expense_id = %expense.id,
            members = shares.len(),
            amount = %expense.amount,
            "Allocated expense"
        );
        Ok(shares)
    }

    /// Returns the ids in ascending order with duplicates removed.
    #[must_use]
    pub fn sorted_members<I>(member_ids: I) -> Vec<MemberId>
    where
        I: IntoIterator<Item = MemberId>,
    {
        member_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
