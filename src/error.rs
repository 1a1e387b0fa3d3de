//! Unified error type for the StableSwap core.
//!
//! Every fallible operation in the crate returns [`AmmError`], so callers
//! can distinguish invalid inputs from domain violations, solver failures
//! and arithmetic guards without inspecting message strings.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`AmmError::Input`] | shape mismatch, bad index, zero amplification, LP over-removal |
//! | [`AmmError::Domain`] | zero balance, zero invariant, trade that would drain or invert a balance |
//! | [`AmmError::Convergence`] | a solver exhausted its iteration cap or diverged |
//! | [`AmmError::Overflow`] / [`AmmError::Underflow`] / [`AmmError::DivisionByZero`] | checked arithmetic guards |
//! | [`AmmError::InvalidConfiguration`] | a configuration struct failed validation |

use thiserror::Error;

/// Error returned by all fallible operations in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmmError {
    /// The inputs violate a mathematical precondition of the curve.
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// A numerical solver failed to converge.
    #[error("{solver} did not converge after {iterations} iterations")]
    Convergence {
        /// Which solver gave up (`"invariant"` or `"swap"`).
        solver: &'static str,
        /// Iterations spent before giving up.
        iterations: u32,
    },

    /// The caller supplied malformed input.
    #[error("invalid input: {0}")]
    Input(&'static str),

    /// An intermediate value did not fit the working integer width.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would have produced a negative value.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;
