//! Common value types used across the engine.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{Currency, Money};
