//! Configuration for a multi-asset StableSwap pool.

use super::SolverConfig;
use crate::domain::{validate_balances, FeeRate, MIN_AMP};
use crate::error::AmmError;

/// Configuration for a StableSwap pool of `n` assets.
///
/// # Amplification Parameter
///
/// The `amplification` parameter (`A`) controls the curve shape:
///
/// - `A = 1`: close to constant product
/// - `A → ∞`: approaches constant sum (1:1 swaps)
/// - typical range for pegged assets: 50–5000
///
/// # Invariant
///
/// ```text
/// Ann · S + D = Ann · D + D^(n+1) / (n^n · Π x_i),   Ann = A · n^n
/// ```
///
/// # Validation
///
/// - `n ≥ 2` and every initial balance is positive.
/// - `A ≥ 1`.
/// - The solver settings pass [`SolverConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StableSwapConfig {
    amplification: u128,
    fee_rate: FeeRate,
    initial_balances: Vec<u128>,
    #[cfg_attr(feature = "serde", serde(default))]
    solver: SolverConfig,
}

impl StableSwapConfig {
    /// Creates a pool configuration with default solver settings.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `amplification` is zero.
    /// - [`AmmError::Input`] if the asset count is unsupported.
    /// - [`AmmError::Domain`] if any initial balance is zero.
    pub fn new(
        amplification: u128,
        fee_rate: FeeRate,
        initial_balances: Vec<u128>,
    ) -> Result<Self, AmmError> {
        Self::with_solver(
            amplification,
            fee_rate,
            initial_balances,
            SolverConfig::default(),
        )
    }

    /// Creates a pool configuration with explicit solver settings.
    ///
    /// # Errors
    ///
    /// Same as [`StableSwapConfig::new`], plus any
    /// [`SolverConfig::validate`] failure.
    pub fn with_solver(
        amplification: u128,
        fee_rate: FeeRate,
        initial_balances: Vec<u128>,
        solver: SolverConfig,
    ) -> Result<Self, AmmError> {
        let config = Self {
            amplification,
            fee_rate,
            initial_balances,
            solver,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`StableSwapConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.amplification < MIN_AMP {
            return Err(AmmError::InvalidConfiguration(
                "amplification must be positive",
            ));
        }
        validate_balances(&self.initial_balances)?;
        self.solver.validate()
    }

    /// Returns the amplification coefficient.
    #[must_use]
    pub const fn amplification(&self) -> u128 {
        self.amplification
    }

    /// Returns the fee rate.
    #[must_use]
    pub const fn fee_rate(&self) -> FeeRate {
        self.fee_rate
    }

    /// Returns the initial balances.
    #[must_use]
    pub fn initial_balances(&self) -> &[u128] {
        &self.initial_balances
    }

    /// Returns the solver settings.
    #[must_use]
    pub const fn solver(&self) -> SolverConfig {
        self.solver
    }
}
