//! Property-based tests for expense allocation.
//!
//! - Allocation sum invariant: shares add up to the expense amount
//! - Fairness: no two shares differ by more than one minor unit
//! - Payer invariant: exactly one settled share, owned by the payer

use chrono::Utc;
use proptest::prelude::*;

use fairshare_shared::{Currency, ExpenseId, GroupId, MemberId, Money};

use super::Allocator;
use crate::ledger::Expense;

/// Strategy to generate positive amounts (1 minor unit to 10,000,000.00).
fn positive_minor_units() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy to generate a group of unique, ascending member ids.
fn member_ids() -> impl Strategy<Value = Vec<MemberId>> {
    prop::collection::btree_set(1i64..10_000, 1..50)
        .prop_map(|ids| ids.into_iter().map(MemberId).collect())
}

fn make_expense(payer: MemberId, minor: i64) -> Expense {
    Expense {
        id: ExpenseId(1),
        group_id: GroupId(1),
        payer_id: payer,
        amount: Money::of_minor_units(minor, Currency::USD),
        description: "prop".to_string(),
        spent_on: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* amount and group, the shares SHALL sum exactly to the amount
    /// and differ by at most one minor unit.
    #[test]
    fn prop_allocation_sum_and_spread(
        minor in positive_minor_units(),
        ids in member_ids(),
        payer_pick in any::<prop::sample::Index>(),
    ) {
        let payer = ids[payer_pick.index(ids.len())];
        let expense = make_expense(payer, minor);

        let shares = Allocator::allocate(&expense, &ids).unwrap();

        prop_assert_eq!(shares.len(), ids.len());
        let sum = Money::try_sum(Currency::USD, shares.iter().map(|s| s.amount())).unwrap();
        prop_assert_eq!(sum, expense.amount);

        let max = shares.iter().map(|s| s.amount().minor_units()).max().unwrap();
        let min = shares.iter().map(|s| s.amount().minor_units()).min().unwrap();
        prop_assert!(max - min <= 1);
    }

    /// *For any* valid allocation, exactly one share SHALL be settled and it
    /// SHALL belong to the payer.
    #[test]
    fn prop_only_payer_share_settled(
        minor in positive_minor_units(),
        ids in member_ids(),
        payer_pick in any::<prop::sample::Index>(),
    ) {
        let payer = ids[payer_pick.index(ids.len())];
        let shares = Allocator::allocate(&make_expense(payer, minor), &ids).unwrap();

        let settled: Vec<MemberId> = shares
            .iter()
            .filter(|s| s.is_settled())
            .map(|s| s.member_id())
            .collect();
        prop_assert_eq!(settled, vec![payer]);
    }

    /// *For any* allocation, repeating it with the same ordering SHALL give
    /// identical shares.
    #[test]
    fn prop_allocation_is_deterministic(
        minor in positive_minor_units(),
        ids in member_ids(),
    ) {
        let expense = make_expense(ids[0], minor);
        let first = Allocator::allocate(&expense, &ids).unwrap();
        let second = Allocator::allocate(&expense, &ids).unwrap();
        prop_assert_eq!(first, second);
    }
}
