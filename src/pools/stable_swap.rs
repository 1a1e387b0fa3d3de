//! Stateful multi-asset StableSwap pool.
//!
//! [`StableSwapPool`] holds balances, the LP supply and lifetime fee
//! counters, and applies the outcomes of the [`operations`](super::operations)
//! functions.  Every mutating call computes the full outcome against the
//! current state first and only then commits, so an error leaves the pool
//! exactly as it was.
//!
//! # Fee Accounting
//!
//! Trade and imbalance fees leave the pool balances and are recorded per
//! asset in [`StableSwapPool::accumulated_fees`]:
//!
//! | Operation | Balance update | Fee counter |
//! |-----------|----------------|-------------|
//! | exchange | `x_i += dx`, `x_j = y` | `fees[j] += fee` |
//! | add liquidity | `x = after − fees` | `fees += imbalance fees` |
//! | remove (imbalanced) | `x = after − fees` | `fees += imbalance fees` |
//! | remove (proportional) | `x = remaining` | unchanged |

use primitive_types::U256;
use tracing::debug;

use super::operations;
use crate::config::{SolverConfig, StableSwapConfig};
use crate::curve::InvariantSolver;
use crate::domain::{
    AddLiquidityOutcome, FeeRate, RemoveImbalanceOutcome, RemoveLiquidityOutcome, SwapOutcome,
};
use crate::error::AmmError;
use crate::math::{to_u128, CheckedArithmetic};
use crate::traits::{FromConfig, LiquidityPool, SwapPool};

/// A multi-asset StableSwap pool.
///
/// Created from a [`StableSwapConfig`] via [`FromConfig`].  The initial LP
/// supply equals the invariant `D` of the initial balances.
///
/// # State
///
/// - `balances`: current asset balances, one per index.
/// - `lp_supply`: outstanding LP tokens.
/// - `accumulated_fees`: lifetime fee counters, one per index.
///
/// The invariant is never cached; [`StableSwapPool::invariant`] solves it
/// from the current balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableSwapPool {
    amplification: u128,
    fee_rate: FeeRate,
    solver: SolverConfig,
    balances: Vec<u128>,
    lp_supply: u128,
    accumulated_fees: Vec<u128>,
}

impl StableSwapPool {
    /// Number of pooled assets.
    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.balances.len()
    }

    /// Solver settings used by every operation on this pool.
    #[must_use]
    pub const fn solver(&self) -> SolverConfig {
        self.solver
    }

    /// Lifetime fees collected per asset.
    #[must_use]
    pub fn accumulated_fees(&self) -> &[u128] {
        &self.accumulated_fees
    }

    /// Solves the invariant `D` of the current balances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Domain`] if a balance has been fully withdrawn.
    /// - [`AmmError::Convergence`] if the invariant cannot be solved.
    pub fn invariant(&self) -> Result<U256, AmmError> {
        InvariantSolver::new(self.solver).solve(&self.balances, self.amplification)
    }

    fn credit_fees(&mut self, fees: &[u128]) -> Result<(), AmmError> {
        let updated = self
            .accumulated_fees
            .iter()
            .zip(fees)
            .map(|(acc, fee)| {
                acc.checked_add(*fee)
                    .ok_or(AmmError::Overflow("accumulated fee overflow"))
            })
            .collect::<Result<Vec<u128>, AmmError>>()?;
        self.accumulated_fees = updated;
        Ok(())
    }
}

impl FromConfig<StableSwapConfig> for StableSwapPool {
    /// Creates a new pool from the given configuration.
    ///
    /// # Errors
    ///
    /// - Propagates any error from [`StableSwapConfig::validate`].
    /// - Returns [`AmmError::Convergence`] if the initial `D` cannot be
    ///   solved.
    fn from_config(config: &StableSwapConfig) -> Result<Self, AmmError> {
        config.validate()?;

        let balances = config.initial_balances().to_vec();
        let d = InvariantSolver::new(config.solver()).solve(&balances, config.amplification())?;
        let lp_supply = to_u128(d)?;

        debug!(
            n = balances.len(),
            amp = %config.amplification(),
            lp_supply = %lp_supply,
            "stableswap pool created"
        );

        Ok(Self {
            amplification: config.amplification(),
            fee_rate: config.fee_rate(),
            solver: config.solver(),
            accumulated_fees: vec![0; balances.len()],
            balances,
            lp_supply,
        })
    }
}

impl SwapPool for StableSwapPool {
    fn quote(&self, i: usize, j: usize, dx: u128) -> Result<SwapOutcome, AmmError> {
        operations::exchange(
            i,
            j,
            dx,
            &self.balances,
            self.amplification,
            self.fee_rate,
            &self.solver,
        )
    }

    /// Executes an exchange and commits `x_i += dx`, `x_j = y`.
    ///
    /// # Errors
    ///
    /// Same as [`SwapPool::quote`]; the pool is unchanged on error.
    fn exchange(&mut self, i: usize, j: usize, dx: u128) -> Result<SwapOutcome, AmmError> {
        let outcome = self.quote(i, j, dx)?;

        let new_in = self.balances[i].safe_add(&dx)?;
        let new_fee = self.accumulated_fees[j]
            .checked_add(outcome.fee())
            .ok_or(AmmError::Overflow("accumulated fee overflow"))?;

        self.balances[i] = new_in;
        self.balances[j] = outcome.new_balance_out();
        self.accumulated_fees[j] = new_fee;
        Ok(outcome)
    }

    fn balances(&self) -> &[u128] {
        &self.balances
    }

    fn fee_rate(&self) -> FeeRate {
        self.fee_rate
    }

    fn amplification(&self) -> u128 {
        self.amplification
    }
}

impl LiquidityPool for StableSwapPool {
    /// Deposits `deposits`, then commits the post-fee balances and mints LP.
    ///
    /// # Errors
    ///
    /// See [`operations::add_liquidity`]; the pool is unchanged on error.
    fn add_liquidity(&mut self, deposits: &[u128]) -> Result<AddLiquidityOutcome, AmmError> {
        let outcome = operations::add_liquidity(
            &self.balances,
            deposits,
            self.amplification,
            self.fee_rate,
            self.lp_supply,
            &self.solver,
        )?;
        let supply = self.lp_supply.safe_add(&outcome.minted())?;

        self.credit_fees(outcome.imbalance().fees())?;
        self.balances = outcome.final_balances().to_vec();
        self.lp_supply = supply;
        Ok(outcome)
    }

    /// Burns `lp_amount` and commits the remaining balances.
    ///
    /// # Errors
    ///
    /// See [`operations::remove_liquidity`]; the pool is unchanged on error.
    fn remove_liquidity(&mut self, lp_amount: u128) -> Result<RemoveLiquidityOutcome, AmmError> {
        let outcome = operations::remove_liquidity(&self.balances, self.lp_supply, lp_amount)?;
        let supply = self.lp_supply.safe_sub(&outcome.burned())?;

        self.balances = outcome.remaining().to_vec();
        self.lp_supply = supply;
        Ok(outcome)
    }

    /// Withdraws `withdrawals`, then commits the post-fee balances and
    /// burns LP.
    ///
    /// # Errors
    ///
    /// See [`operations::remove_liquidity_imbalance`]; the pool is unchanged
    /// on error.
    fn remove_liquidity_imbalance(
        &mut self,
        withdrawals: &[u128],
    ) -> Result<RemoveImbalanceOutcome, AmmError> {
        let outcome = operations::remove_liquidity_imbalance(
            &self.balances,
            withdrawals,
            self.amplification,
            self.fee_rate,
            self.lp_supply,
            &self.solver,
        )?;
        let supply = self.lp_supply.safe_sub(&outcome.burned())?;

        self.credit_fees(outcome.imbalance().fees())?;
        self.balances = outcome.final_balances().to_vec();
        self.lp_supply = supply;
        Ok(outcome)
    }

    fn lp_supply(&self) -> u128 {
        self.lp_supply
    }
}
