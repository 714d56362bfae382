//! Settlement service orchestrating allocation, ledger and conversion.
//!
//! This module provides the main service interface for the request layer:
//! - `record_expense` turns a validated expense into share rows to persist
//! - `get_group_report` derives balances, settle-up transfers and an
//!   optional foreign-currency view
//!
//! All inputs are plain in-memory values; the service holds no storage
//! handles and no mutable state. Persisting an expense together with its
//! shares in one transaction is the caller's responsibility.

use std::collections::HashMap;
use std::sync::Arc;

use fairshare_shared::{Currency, ExpenseId, MemberId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::SettlementResult;
use super::types::{ConversionStatus, GroupReport, SettlementOptions};
use crate::allocation::Allocator;
use crate::currency::{CurrencyConverter, convert_balances, rate_with_deadline};
use crate::ledger::{Balances, Expense, Ledger, Share, Transfer};

/// Settlement service.
///
/// Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct SettlementService {
    converter: Arc<dyn CurrencyConverter>,
    options: SettlementOptions,
}

impl std::fmt::Debug for SettlementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SettlementService {
    /// Creates a service backed by the given rate source.
    #[must_use]
    pub fn new(converter: Arc<dyn CurrencyConverter>, options: SettlementOptions) -> Self {
        Self { converter, options }
    }

    /// Returns the configured options.
    #[must_use]
    pub const fn options(&self) -> &SettlementOptions {
        &self.options
    }

    /// Validates an expense and splits it across `member_ids`.
    ///
    /// `member_ids` must be in a stable order (ascending id) so the rounding
    /// remainder lands on the same members every time.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a non-positive amount, otherwise the allocator's
    /// `EmptyGroup`, `PayerNotMember` or `DuplicateMember`.
    pub fn record_expense(&self, expense: &Expense, member_ids: &[MemberId]) -> SettlementResult<Vec<Share>> {
        expense.validate()?;
        let shares = Allocator::allocate(expense, member_ids)?;
        debug!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            payer_id = %expense.payer_id,
            amount = %expense.amount,
            shares = shares.len(),
            "Recorded expense"
        );
        Ok(shares)
    }

    /// Computes each member's net balance in base currency.
    pub fn compute_balances(
        &self,
        shares: &[Share],
        expenses: &HashMap<ExpenseId, Expense>,
    ) -> SettlementResult<Balances> {
        Ledger::compute_balances(shares, expenses)
    }

    /// Suggests transfers closing every balance.
    pub fn suggest_settlements(&self, balances: &Balances) -> SettlementResult<Vec<Transfer>> {
        Ledger::suggest_settlements(balances)
    }

    /// Builds the base-currency report without touching the rate source.
    pub fn base_report(
        &self,
        shares: &[Share],
        expenses: &HashMap<ExpenseId, Expense>,
    ) -> SettlementResult<GroupReport> {
        let balances = Ledger::compute_balances(shares, expenses)?;
        let settlements = Ledger::suggest_settlements(&balances)?;
        let total = Ledger::group_total(expenses)?;
        let base_currency = balances
            .values()
            .next()
            .map(|money| money.currency())
            .or_else(|| total.map(|money| money.currency()));

        Ok(GroupReport::base(base_currency, balances, settlements, total))
    }

    /// Builds the group report, optionally viewed in `target` currency.
    ///
    /// A missing or late exchange rate never fails the report: the base
    /// figures are returned with `ConversionStatus::Unavailable`.
    pub async fn get_group_report(
        &self,
        shares: &[Share],
        expenses: &HashMap<ExpenseId, Expense>,
        target: Option<Currency>,
    ) -> SettlementResult<GroupReport> {
        self.get_group_report_with_cancel(shares, expenses, target, &CancellationToken::new())
            .await
    }

    /// Same as [`Self::get_group_report`], abandoning the rate lookup as soon
    /// as `cancel` fires. The base-currency report is still returned.
    pub async fn get_group_report_with_cancel(
        &self,
        shares: &[Share],
        expenses: &HashMap<ExpenseId, Expense>,
        target: Option<Currency>,
        cancel: &CancellationToken,
    ) -> SettlementResult<GroupReport> {
        let mut report = self.base_report(shares, expenses)?;

        let Some(target) = target else {
            return Ok(report);
        };
        report.target_currency = Some(target);

        let Some(base) = report.base_currency else {
            report.conversion_status = ConversionStatus::Ok;
            report.converted_balances = Some(Balances::new());
            return Ok(report);
        };

        if base == target {
            report.conversion_status = ConversionStatus::Ok;
            report.converted_balances = Some(report.balances.clone());
            report.converted_total = report.total;
            return Ok(report);
        }

        let rate = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!(%base, %target, "Report cancelled before exchange rate arrived");
                None
            }
            rate = rate_with_deadline(self.converter.as_ref(), base, target, self.options.rate_timeout) => rate,
        };

        let Some(rate) = rate else {
            report.mark_unavailable(format!(
                "Exchange rate {base}->{target} unavailable; balances shown in {base} only"
            ));
            return Ok(report);
        };

        let converted = convert_balances(&report.balances, rate, target).and_then(|balances| {
            let total = report.total.map(|t| t.convert(rate, target)).transpose()?;
            Ok((balances, total))
        });

        match converted {
            Ok((balances, total)) => {
                debug!(%base, %target, %rate, "Converted group report");
                report.conversion_status = ConversionStatus::Ok;
                report.converted_balances = Some(balances);
                report.converted_total = total;
                report.rate = Some(rate);
            }
            Err(err) => {
                warn!(error = %err, %base, %target, "Conversion failed; keeping base currency");
                report.mark_unavailable(format!(
                    "Conversion {base}->{target} failed: {err}; balances shown in {base} only"
                ));
            }
        }

        Ok(report)
    }
}
