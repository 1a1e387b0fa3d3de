//! Generic construction trait for pool instantiation from configuration.
//!
//! # Validation Contract
//!
//! Implementations **must** validate every configuration invariant during
//! construction.  A successfully constructed pool is guaranteed to be in a
//! valid initial state.

use crate::error::AmmError;

/// Builds a pool from a configuration.
///
/// There is no blanket implementation; every pool/config pairing is
/// explicit.
pub trait FromConfig<C> {
    /// Creates a new pool instance from the given configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if any pool parameter is out of
    ///   range or inconsistent.
    /// - [`AmmError::Convergence`] if the initial invariant cannot be
    ///   solved.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
