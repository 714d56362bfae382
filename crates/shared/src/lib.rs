//! Shared types, errors, and configuration for FairShare.
//!
//! This crate provides common types used across all other crates:
//! - Money in integer minor units with a currency code
//! - Typed IDs for type-safe entity references
//! - Value-level error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{MoneyError, MoneyResult};
pub use types::{Currency, ExpenseId, GroupId, MemberId, Money};
