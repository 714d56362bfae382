//! Group snapshot files.
//!
//! A snapshot is the JSON export of one group: its members, expenses and
//! share rows. The CLI reads it, runs the engine, and writes it back when a
//! command changes it.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, bail};
use fairshare_core::{Allocator, Expense, Share};
use fairshare_shared::{Currency, ExpenseId, GroupId, MemberId, Money};
use serde::{Deserialize, Serialize};

/// One group's persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group_id: GroupId,
    /// Currency new expenses are recorded in when none is given.
    #[serde(default)]
    pub currency: Option<Currency>,
    pub members: Vec<MemberId>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub shares: Vec<Share>,
}

impl GroupSnapshot {
    /// Reads a snapshot from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    /// Parses and checks a snapshot.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.check()?;
        Ok(snapshot)
    }

    /// Writes the snapshot back, pretty-printed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("writing snapshot {}", path.display()))
    }

    /// Members in ascending id order, the order allocation expects.
    pub fn sorted_members(&self) -> Vec<MemberId> {
        Allocator::sorted_members(self.members.iter().copied())
    }

    /// Expenses keyed by id.
    pub fn expense_map(&self) -> HashMap<ExpenseId, Expense> {
        self.expenses.iter().map(|e| (e.id, e.clone())).collect()
    }

    /// Next free expense id.
    pub fn next_expense_id(&self) -> ExpenseId {
        ExpenseId(self.expenses.iter().map(|e| e.id.0).max().unwrap_or(0) + 1)
    }

    /// Currency every expense of the group is recorded in, if one is fixed
    /// yet.
    pub fn group_currency(&self) -> Option<Currency> {
        self.currency
            .or_else(|| self.expenses.first().map(|e| e.amount.currency()))
    }

    /// Checks that a new expense can join the group.
    pub fn admit(&self, expense: &Expense) -> anyhow::Result<()> {
        if self.expenses.iter().any(|e| e.id == expense.id) {
            bail!("expense {} already exists", expense.id);
        }
        if expense.group_id != self.group_id {
            bail!("expense {} belongs to group {}, snapshot is group {}", expense.id, expense.group_id, self.group_id);
        }
        if let Some(currency) = self.group_currency() {
            if expense.amount.currency() != currency {
                bail!(
                    "expense {} is in {}, group {} records expenses in {currency}",
                    expense.id,
                    expense.amount.currency(),
                    self.group_id
                );
            }
        }
        Ok(())
    }

    /// Appends a recorded expense with its shares.
    pub fn push_expense(&mut self, expense: Expense, shares: Vec<Share>) -> anyhow::Result<()> {
        self.admit(&expense)?;
        self.expenses.push(expense);
        self.shares.extend(shares);
        Ok(())
    }

    /// Deletes an expense together with all of its shares.
    pub fn remove_expense(&mut self, expense_id: ExpenseId) -> anyhow::Result<(Expense, Vec<Share>)> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == expense_id)
            .with_context(|| format!("no expense {expense_id} in group {}", self.group_id))?;
        let expense = self.expenses.remove(position);
        let (removed, kept) = std::mem::take(&mut self.shares)
            .into_iter()
            .partition(|s| s.expense_id() == expense_id);
        self.shares = kept;
        Ok((expense, removed))
    }

    /// Flags one member's share of one expense as paid.
    pub fn mark_paid(&mut self, expense_id: ExpenseId, member_id: MemberId) -> anyhow::Result<&Share> {
        let share = self
            .shares
            .iter_mut()
            .find(|s| s.expense_id() == expense_id && s.member_id() == member_id)
            .with_context(|| format!("no share of expense {expense_id} for member {member_id}"))?;
        share.mark_settled();
        Ok(share)
    }

    /// Enforces the row invariants a storage layer would: one currency per
    /// group, no orphan shares, shares summing exactly to their expense, and
    /// the payer's own share settled.
    fn check(&self) -> anyhow::Result<()> {
        let currency = self.group_currency();
        // expense id -> (expense, sum of its shares, payer's share settled)
        let mut rows: HashMap<ExpenseId, (&Expense, Money, bool)> = HashMap::with_capacity(self.expenses.len());

        for expense in &self.expenses {
            if expense.group_id != self.group_id {
                bail!(
                    "expense {} belongs to group {}, snapshot is group {}",
                    expense.id,
                    expense.group_id,
                    self.group_id
                );
            }
            if let Some(currency) = currency.filter(|c| *c != expense.amount.currency()) {
                bail!("expense {} is in {}, group records {currency}", expense.id, expense.amount.currency());
            }
            expense.validate()?;
            let zero = Money::zero(expense.amount.currency());
            if rows.insert(expense.id, (expense, zero, false)).is_some() {
                bail!("expense {} appears more than once", expense.id);
            }
        }

        for share in &self.shares {
            let (expense, sum, payer_settled) = rows.get_mut(&share.expense_id()).with_context(|| {
                format!("share of member {} references unknown expense {}", share.member_id(), share.expense_id())
            })?;
            *sum = sum.checked_add(share.amount())?;
            if share.member_id() == expense.payer_id && share.is_settled() {
                *payer_settled = true;
            }
        }

        for (expense, sum, payer_settled) in rows.values() {
            if *sum != expense.amount {
                bail!("shares of expense {} sum to {sum}, expected {}", expense.id, expense.amount);
            }
            if !payer_settled {
                bail!("payer {} has no settled share of expense {}", expense.payer_id, expense.id);
            }
        }
        Ok(())
    }
}
