//! Expense allocation across group members.

pub mod allocator;

#[cfg(test)]
mod props;

pub use allocator::Allocator;
