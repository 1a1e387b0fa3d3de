//! Core swap pool trait for quoting and executing exchanges.
//!
//! [`SwapPool`] covers the trading side of a multi-asset pool.  Assets are
//! addressed by their index in [`SwapPool::balances`]; the order is fixed
//! for the lifetime of the pool.
//!
//! # Fee Deduction Invariant
//!
//! The trade fee is taken from the raw output, never from the input:
//!
//! ```text
//! dy         = balance_out − y(balance_in + dx)
//! fee        = dy × fee_bps / 10_000
//! amount_out = dy − fee
//! ```

use crate::domain::{FeeRate, SwapOutcome};
use crate::error::AmmError;

/// Core trait for multi-asset StableSwap pools.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common error
/// variants include:
///
/// - [`AmmError::Input`]: same asset on both sides or an index out of range
/// - [`AmmError::Domain`]: the trade would drain or overdraw the output
/// - [`AmmError::Convergence`]: the invariant could not be solved
pub trait SwapPool {
    /// Prices an exchange of `dx` of asset `i` for asset `j` without
    /// touching pool state.
    ///
    /// # Errors
    ///
    /// Same as [`exchange`](Self::exchange).
    fn quote(&self, i: usize, j: usize, dx: u128) -> Result<SwapOutcome, AmmError>;

    /// Executes an exchange of `dx` of asset `i` for asset `j`.
    ///
    /// Balance updates are atomic: the exchange either completes fully or
    /// returns an error with the pool unchanged.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Input`] if `i == j` or either index is out of range.
    /// - [`AmmError::Domain`] if the output would be negative or drain
    ///   asset `j`.
    /// - [`AmmError::Overflow`] if the input overflows the balance of `i`.
    fn exchange(&mut self, i: usize, j: usize, dx: u128) -> Result<SwapOutcome, AmmError>;

    /// Current balances, one per asset.
    #[must_use]
    fn balances(&self) -> &[u128];

    /// Trade fee rate.
    #[must_use]
    fn fee_rate(&self) -> FeeRate;

    /// Amplification coefficient `A`.
    #[must_use]
    fn amplification(&self) -> u128;
}
