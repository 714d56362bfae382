//! Settlement orchestration: recording expenses and reporting balances.
//!
//! Combines the allocator, the ledger and the currency converter behind the
//! entry points the request layer calls.

pub mod error;
pub mod service;
pub mod types;


pub use error::{SettlementError, SettlementResult};
pub use service::SettlementService;
pub use types::{ConversionStatus, GroupReport, SettlementOptions};
