//! Report types returned by the settlement service.

use std::time::Duration;

use fairshare_shared::config::SettlementConfig;
use fairshare_shared::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Balances, Transfer};

/// Outcome of the optional foreign-currency view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// No target currency was asked for.
    NotRequested,
    /// Converted figures are present.
    Ok,
    /// No usable rate; only base-currency figures are present.
    Unavailable,
}

/// Snapshot of a group's financial position.
///
/// Base-currency figures are always present; the converted view is purely
/// additive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Currency the group's expenses are recorded in, `None` for an empty group.
    pub base_currency: Option<Currency>,
    /// Net balance per member in base currency.
    pub balances: Balances,
    /// Suggested transfers closing every balance.
    pub settlements: Vec<Transfer>,
    /// Sum of every expense in the group.
    pub total: Option<Money>,
    /// Currency the caller asked to view the report in.
    pub target_currency: Option<Currency>,
    /// Whether the converted view is present.
    pub conversion_status: ConversionStatus,
    /// Human-readable explanation when conversion is unavailable.
    pub conversion_note: Option<String>,
    /// Rate used for the converted view (1 base = rate target).
    pub rate: Option<Decimal>,
    /// Net balance per member in the target currency.
    pub converted_balances: Option<Balances>,
    /// Group total in the target currency.
    pub converted_total: Option<Money>,
}

impl GroupReport {
    /// Creates a base-currency-only report.
    #[must_use]
    pub fn base(
        base_currency: Option<Currency>,
        balances: Balances,
        settlements: Vec<Transfer>,
        total: Option<Money>,
    ) -> Self {
        Self {
            base_currency,
            balances,
            settlements,
            total,
            target_currency: None,
            conversion_status: ConversionStatus::NotRequested,
            conversion_note: None,
            rate: None,
            converted_balances: None,
            converted_total: None,
        }
    }

    /// Drops any converted figures and records why.
    pub(crate) fn mark_unavailable(&mut self, note: String) {
        self.conversion_status = ConversionStatus::Unavailable;
        self.conversion_note = Some(note);
        self.rate = None;
        self.converted_balances = None;
        self.converted_total = None;
    }

    /// Returns true if converted figures are present.
    #[must_use]
    pub fn is_converted(&self) -> bool {
        self.conversion_status == ConversionStatus::Ok
    }
}

/// Recognized options for the settlement service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementOptions {
    /// Deadline for a single rate lookup.
    pub rate_timeout: Duration,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        Self::from(&SettlementConfig::default())
    }
}

impl From<&SettlementConfig> for SettlementOptions {
    fn from(config: &SettlementConfig) -> Self {
        Self {
            rate_timeout: config.rate_timeout(),
        }
    }
}
