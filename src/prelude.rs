//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use stableswap_core::prelude::*;
//! ```

pub use crate::config::{SolverConfig, StableSwapConfig, YSolveMethod};
pub use crate::curve::{compute_d, solve_y, InvariantSolver, SwapSolver};
pub use crate::domain::{FeeRate, Rounding, SwapOutcome};
pub use crate::error::{AmmError, Result};
pub use crate::math::{CheckedArithmetic, U256};
pub use crate::pools::StableSwapPool;
pub use crate::traits::{FromConfig, LiquidityPool, SwapPool};
