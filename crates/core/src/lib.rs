//! Core settlement engine for FairShare.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the only
//! outside contact is the `CurrencyConverter` trait, implemented elsewhere.
//!
//! # Modules
//!
//! - `allocation` - Exact equal splitting of expenses into shares
//! - `ledger` - Per-member net balances and settle-up transfers
//! - `currency` - Exchange-rate contract and balance conversion
//! - `settlement` - Orchestration and group reports

pub mod allocation;
pub mod currency;
pub mod ledger;
pub mod settlement;

pub use allocation::Allocator;
pub use currency::{CurrencyConverter, ExchangeRate, NoRates};
pub use ledger::{Balances, Expense, Ledger, Share, Transfer};
pub use settlement::{
    ConversionStatus, GroupReport, SettlementError, SettlementOptions, SettlementResult,
    SettlementService,
};
