//! Pool and solver configuration.
//!
//! Configuration structs are validated on construction and again when a
//! pool is built from them, so a value obtained through deserialization
//! cannot bypass the checks.

mod solver;
mod stable_swap;

pub use solver::{SolverConfig, YSolveMethod, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
pub use stable_swap::StableSwapConfig;
