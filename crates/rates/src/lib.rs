//! Exchange-rate adapters implementing [`fairshare_core::CurrencyConverter`].
//!
//! - [`HttpRateClient`] - live rates from an exchangerate.host-style API
//! - [`CachedConverter`] - TTL cache in front of any converter
//! - [`FixedRates`] - in-memory table for offline use and tests
//!
//! Every adapter answers `None` instead of failing; the engine decides what
//! an unavailable rate means for a report.

pub mod cache;
pub mod fixed;
pub mod http;

pub use cache::CachedConverter;
pub use fixed::FixedRates;
pub use http::{HttpRateClient, RateClientError};
