//! Exchange rates and foreign-currency views of balances.

pub mod conversion;
pub mod converter;
pub mod exchange;

pub use conversion::convert_balances;
pub use converter::{CurrencyConverter, NoRates, rate_with_deadline};
pub use exchange::ExchangeRate;
