//! Settle-up suggestions.
//!
//! Greedy minimal-transfer matching: the largest debtor pays the largest
//! creditor `min(debt, credit)`, both are reduced, and anyone at zero drops
//! out. Every step retires at least one party and the last step retires two,
//! so `n` non-zero balances need at most `n - 1` transfers.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fairshare_shared::{MemberId, Money};
use tracing::debug;

use super::balance::{Balances, balance_currency};
use super::types::Transfer;
use crate::settlement::error::{SettlementError, SettlementResult};

/// Outstanding magnitude in minor units; ties pop the lower member id first.
type Party = (i64, Reverse<MemberId>);

/// Suggests transfers that bring every balance to zero.
///
/// Balances must net to zero and share one currency.
pub fn suggest_settlements(balances: &Balances) -> SettlementResult<Vec<Transfer>> {
    let Some(currency) = balance_currency(balances)? else {
        return Ok(Vec::new());
    };

    let residual = Money::try_sum(currency, balances.values().copied())?;
    if !residual.is_zero() {
        return Err(SettlementError::UnbalancedLedger(residual));
    }

    let mut debtors: BinaryHeap<Party> = BinaryHeap::new();
    let mut creditors: BinaryHeap<Party> = BinaryHeap::new();
    for (member, balance) in balances {
        if balance.is_negative() {
            debtors.push((balance.abs()?.minor_units(), Reverse(*member)));
        } else if balance.is_positive() {
            creditors.push((balance.minor_units(), Reverse(*member)));
        }
    }

    let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
    while let (Some(&(debt, Reverse(from))), Some(&(credit, Reverse(to)))) =
        (debtors.peek(), creditors.peek())
    {
        debtors.pop();
        creditors.pop();

        let amount = debt.min(credit);
        transfers.push(Transfer {
            from,
            to,
            amount: Money::of_minor_units(amount, currency),
        });

        if debt > amount {
            debtors.push((debt - amount, Reverse(from)));
        }
        if credit > amount {
            creditors.push((credit - amount, Reverse(to)));
        }
    }

    debug!(
        parties = balances.values().filter(|b| !b.is_zero()).count(),
        transfers = transfers.len(),
        "Suggested settlements"
    );
    Ok(transfers)
}

/// Applies transfers to a balance map: the payer's balance rises, the
/// receiver's falls.
pub fn apply_transfers(balances: &Balances, transfers: &[Transfer]) -> SettlementResult<Balances> {
    let mut result = balances.clone();
    for transfer in transfers {
        let zero = Money::zero(transfer.amount.currency());

        let from = result.entry(transfer.from).or_insert(zero);
        *from = from.checked_add(transfer.amount)?;

        let to = result.entry(transfer.to).or_insert(zero);
        *to = to.checked_sub(transfer.amount)?;
    }
    Ok(result)
}
