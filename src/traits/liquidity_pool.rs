//! Liquidity management trait extending [`SwapPool`].
//!
//! # LP Accounting Invariant
//!
//! [`LiquidityPool::lp_supply`] only changes through the three liquidity
//! methods.  Exchanges move balances but never mint or burn LP.

use super::SwapPool;
use crate::domain::{AddLiquidityOutcome, RemoveImbalanceOutcome, RemoveLiquidityOutcome};
use crate::error::AmmError;

/// Trait for pools that accept deposits and withdrawals against an LP
/// supply.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common error
/// variants include:
///
/// - [`AmmError::Input`]: length mismatch, empty deposit, LP over-removal
/// - [`AmmError::Domain`]: a withdrawal would empty an asset
/// - [`AmmError::Overflow`]: a deposit overflows a balance
pub trait LiquidityPool: SwapPool {
    /// Deposits one amount per asset, charging the imbalance fee and
    /// minting LP in proportion to the invariant gained.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Input`] if `deposits` has the wrong length or is all
    ///   zero.
    /// - [`AmmError::Overflow`] if a deposit overflows a balance.
    fn add_liquidity(&mut self, deposits: &[u128]) -> Result<AddLiquidityOutcome, AmmError>;

    /// Burns `lp_amount` for a proportional share of every asset.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Input`] if `lp_amount` exceeds the supply.
    fn remove_liquidity(&mut self, lp_amount: u128) -> Result<RemoveLiquidityOutcome, AmmError>;

    /// Withdraws arbitrary per-asset amounts, burning LP for the invariant
    /// lost plus the imbalance fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Input`] on a length mismatch, an all-zero withdrawal,
    ///   or a burn above the supply.
    /// - [`AmmError::Domain`] if a withdrawal would empty an asset.
    fn remove_liquidity_imbalance(
        &mut self,
        withdrawals: &[u128],
    ) -> Result<RemoveImbalanceOutcome, AmmError>;

    /// Outstanding LP supply.
    #[must_use]
    fn lp_supply(&self) -> u128;
}
