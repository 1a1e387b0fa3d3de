//! Convergence settings for the invariant and swap solvers.

use crate::error::AmmError;

/// Default Newton-Raphson iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 255;

/// Default convergence tolerance, in raw token units.
pub const DEFAULT_TOLERANCE: u128 = 1;

/// How the swap solver finds the post-trade balance `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YSolveMethod {
    /// Floor of the positive root of the quadratic, via an integer square root.
    #[default]
    ClosedForm,
    /// Newton-Raphson iteration on the quadratic, seeded with `D`.
    Newton,
}

/// Convergence settings shared by both solvers.
///
/// Newton-Raphson stops when two consecutive iterates differ by at most
/// `tolerance`, or when the residual is exactly zero.  Hitting
/// `max_iterations` counts as non-convergence.
///
/// # Examples
///
/// ```
/// use stableswap_core::config::{SolverConfig, YSolveMethod};
///
/// let cfg = SolverConfig::default();
/// assert_eq!(cfg.max_iterations(), 255);
/// assert_eq!(cfg.tolerance(), 1);
/// assert_eq!(cfg.y_method(), YSolveMethod::ClosedForm);
///
/// assert!(SolverConfig::new(0, 1, YSolveMethod::Newton).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    max_iterations: u32,
    tolerance: u128,
    y_method: YSolveMethod,
}

impl SolverConfig {
    /// Creates a solver configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `max_iterations` is zero.
    /// - [`AmmError::InvalidConfiguration`] if `tolerance` is zero.
    pub fn new(
        max_iterations: u32,
        tolerance: u128,
        y_method: YSolveMethod,
    ) -> Result<Self, AmmError> {
        let config = Self {
            max_iterations,
            tolerance,
            y_method,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] on a zero iteration cap or
    /// a zero tolerance.
    pub const fn validate(&self) -> Result<(), AmmError> {
        if self.max_iterations == 0 {
            return Err(AmmError::InvalidConfiguration(
                "max_iterations must be greater than zero",
            ));
        }
        if self.tolerance == 0 {
            return Err(AmmError::InvalidConfiguration(
                "tolerance must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Returns a copy using `method` for the swap solver.
    #[must_use]
    pub const fn with_y_method(mut self, method: YSolveMethod) -> Self {
        self.y_method = method;
        self
    }

    /// Returns the iteration cap.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Returns the convergence tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> u128 {
        self.tolerance
    }

    /// Returns the swap solver method.
    #[must_use]
    pub const fn y_method(&self) -> YSolveMethod {
        self.y_method
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            y_method: YSolveMethod::ClosedForm,
        }
    }
}
