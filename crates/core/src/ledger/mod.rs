//! Group ledger: net balances and settle-up suggestions.
//!
//! This module implements the core ledger functionality:
//! - Domain types (expenses, shares, transfers)
//! - Per-member balance aggregation over unsettled shares
//! - Greedy minimal-transfer settle-up suggestions
//!
//! All functions are pure and safe to call concurrently.

pub mod balance;
pub mod settle;
pub mod types;

#[cfg(test)]
mod balance_props;

use std::collections::HashMap;

use fairshare_shared::{ExpenseId, Money};

pub use balance::Balances;
pub use types::{Expense, Share, Transfer};

use crate::settlement::error::SettlementResult;

/// Ledger entry points.
///
/// Stateless: every call works only on the values passed in.
pub struct Ledger;

impl Ledger {
    /// Computes each member's net balance from a group's shares.
    ///
    /// See [`balance::compute_balances`].
    pub fn compute_balances(
        shares: &[Share],
        expenses: &HashMap<ExpenseId, Expense>,
    ) -> SettlementResult<Balances> {
        balance::compute_balances(shares, expenses)
    }

    /// Suggests the transfers that close every outstanding balance.
    ///
    /// See [`settle::suggest_settlements`].
    pub fn suggest_settlements(balances: &Balances) -> SettlementResult<Vec<Transfer>> {
        settle::suggest_settlements(balances)
    }

    /// Returns the balances after the given transfers have been paid.
    pub fn apply_transfers(balances: &Balances, transfers: &[Transfer]) -> SettlementResult<Balances> {
        settle::apply_transfers(balances, transfers)
    }

    /// Sums every expense amount in the group.
    pub fn group_total(expenses: &HashMap<ExpenseId, Expense>) -> SettlementResult<Option<Money>> {
        balance::group_total(expenses)
    }
}
