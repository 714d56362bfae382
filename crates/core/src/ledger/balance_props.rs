//! Property-based tests for the ledger.
//!
//! - Zero-sum: balances of a group always net to zero, for allocated and
//!   for arbitrary share sets
//! - Settle-up closes every balance
//! - Transfer count stays below the number of non-zero parties

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;

use fairshare_shared::{Currency, ExpenseId, GroupId, MemberId, Money};

use super::{Expense, Ledger, Share};
use crate::allocation::Allocator;

/// One generated expense: amount, payer index, and which shares get paid.
type ExpenseSeed = (i64, prop::sample::Index, Vec<bool>);

fn group_seed() -> impl Strategy<Value = (Vec<MemberId>, Vec<ExpenseSeed>)> {
    (2usize..9).prop_flat_map(|size| {
        let members = Just((1..=size as i64).map(MemberId).collect::<Vec<_>>());
        let expense = (
            1i64..5_000_000,
            any::<prop::sample::Index>(),
            prop::collection::vec(any::<bool>(), size),
        );
        (members, prop::collection::vec(expense, 0..12))
    })
}

fn build_group(
    members: &[MemberId],
    seeds: &[ExpenseSeed],
) -> (Vec<Share>, HashMap<ExpenseId, Expense>) {
    let mut shares = Vec::new();
    let mut expenses = HashMap::new();
    for (idx, (minor, payer_pick, paid)) in seeds.iter().enumerate() {
        let expense = Expense {
            id: ExpenseId(idx as i64 + 1),
            group_id: GroupId(1),
            payer_id: members[payer_pick.index(members.len())],
            amount: Money::of_minor_units(*minor, Currency::EUR),
            description: format!("expense {idx}"),
            spent_on: Utc::now(),
        };
        let mut allocated = Allocator::allocate(&expense, members).unwrap();
        for (share, paid) in allocated.iter_mut().zip(paid) {
            if *paid {
                share.mark_settled();
            }
        }
        shares.extend(allocated);
        expenses.insert(expense.id, expense);
    }
    (shares, expenses)
}

/// One arbitrary share row: expense index, member, amount, settled.
type ShareSeed = (prop::sample::Index, i64, i64, bool);

/// Well-formed expenses with arbitrary share rows pointing at them; amounts
/// and members are unrelated to any allocation.
fn arbitrary_rows() -> impl Strategy<Value = (Vec<(i64, i64)>, Vec<ShareSeed>)> {
    (
        prop::collection::vec((1i64..20, 1i64..5_000_000), 1..8),
        prop::collection::vec(
            (any::<prop::sample::Index>(), 1i64..20, 0i64..5_000_000, any::<bool>()),
            0..40,
        ),
    )
}

fn build_rows(
    expense_seeds: &[(i64, i64)],
    share_seeds: &[ShareSeed],
) -> (Vec<Share>, HashMap<ExpenseId, Expense>) {
    let expenses: HashMap<ExpenseId, Expense> = expense_seeds
        .iter()
        .enumerate()
        .map(|(idx, (payer, minor))| {
            let expense = Expense {
                id: ExpenseId(idx as i64 + 1),
                group_id: GroupId(1),
                payer_id: MemberId(*payer),
                amount: Money::of_minor_units(*minor, Currency::EUR),
                description: format!("expense {idx}"),
                spent_on: Utc::now(),
            };
            (expense.id, expense)
        })
        .collect();
    let shares = share_seeds
        .iter()
        .map(|(pick, member, minor, settled)| {
            let expense_id = ExpenseId(pick.index(expense_seeds.len()) as i64 + 1);
            Share::new(expense_id, MemberId(*member), Money::of_minor_units(*minor, Currency::EUR), *settled)
        })
        .collect();
    (shares, expenses)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* group, the net balances SHALL sum to exactly zero.
    #[test]
    fn prop_balances_sum_to_zero((members, seeds) in group_seed()) {
        let (shares, expenses) = build_group(&members, &seeds);

        let balances = Ledger::compute_balances(&shares, &expenses).unwrap();

        let sum: i64 = balances.values().map(Money::minor_units).sum();
        prop_assert_eq!(sum, 0);
    }

    /// *For any* share set over well-formed expenses, the net balances SHALL
    /// sum to exactly zero and every payer SHALL have an entry.
    #[test]
    fn prop_arbitrary_shares_sum_to_zero((expense_seeds, share_seeds) in arbitrary_rows()) {
        let (shares, expenses) = build_rows(&expense_seeds, &share_seeds);

        let balances = Ledger::compute_balances(&shares, &expenses).unwrap();

        let sum: i64 = balances.values().map(Money::minor_units).sum();
        prop_assert_eq!(sum, 0);
        for share in &shares {
            prop_assert!(balances.contains_key(&share.member_id()));
            prop_assert!(balances.contains_key(&expenses[&share.expense_id()].payer_id));
        }
    }

    /// *For any* share set over well-formed expenses, the suggested
    /// transfers SHALL close every balance.
    #[test]
    fn prop_arbitrary_shares_settle((expense_seeds, share_seeds) in arbitrary_rows()) {
        let (shares, expenses) = build_rows(&expense_seeds, &share_seeds);
        let balances = Ledger::compute_balances(&shares, &expenses).unwrap();

        let transfers = Ledger::suggest_settlements(&balances).unwrap();
        let after = Ledger::apply_transfers(&balances, &transfers).unwrap();

        prop_assert!(after.values().all(Money::is_zero));
    }

    /// *For any* group, paying the suggested transfers SHALL leave every
    /// balance at zero, using at most one fewer transfer than there are
    /// non-zero balances.
    #[test]
    fn prop_settlements_close_every_balance((members, seeds) in group_seed()) {
        let (shares, expenses) = build_group(&members, &seeds);
        let balances = Ledger::compute_balances(&shares, &expenses).unwrap();

        let transfers = Ledger::suggest_settlements(&balances).unwrap();
        let after = Ledger::apply_transfers(&balances, &transfers).unwrap();

        prop_assert!(after.values().all(Money::is_zero));
        let open = balances.values().filter(|b| !b.is_zero()).count();
        prop_assert!(transfers.len() <= open.saturating_sub(1));
        prop_assert!(transfers.iter().all(|t| t.amount.is_positive() && t.from != t.to));
    }

    /// *For any* group, suggesting settlements twice SHALL give the same list.
    #[test]
    fn prop_settlements_are_deterministic((members, seeds) in group_seed()) {
        let (shares, expenses) = build_group(&members, &seeds);
        let balances = Ledger::compute_balances(&shares, &expenses).unwrap();

        let first = Ledger::suggest_settlements(&balances).unwrap();
        let second = Ledger::suggest_settlements(&balances).unwrap();
        prop_assert_eq!(first, second);
    }
}
