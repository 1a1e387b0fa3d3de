//! Pool operations and the stateful pool built on them.
//!
//! | Item | Role |
//! |------|------|
//! | [`operations`] | stateless add, exchange and remove functions |
//! | [`StableSwapPool`] | balances + LP supply, committing operation outcomes |

pub mod operations;
mod stable_swap;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use operations::{add_liquidity, exchange, remove_liquidity, remove_liquidity_imbalance};
pub use stable_swap::StableSwapPool;
