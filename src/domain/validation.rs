//! Boundary checks shared by every public operation.
//!
//! All of these run before any arithmetic so that a rejected call never
//! leaves partial work behind.

use crate::error::{AmmError, Result};

/// Smallest supported number of pooled assets.
pub const MIN_ASSETS: usize = 2;

/// Smallest accepted amplification coefficient.
pub const MIN_AMP: u128 = 1;

/// Checks the asset count of a balance vector.
///
/// There is no upper bound: a count whose `n^n` or `Ann` leaves 256 bits
/// is reported as [`AmmError::Overflow`] by the curve math instead.
///
/// # Errors
///
/// Returns [`AmmError::Input`] if `len` is below two.
pub const fn validate_asset_count(len: usize) -> Result<()> {
    if len < MIN_ASSETS {
        return Err(AmmError::Input("pool needs at least two assets"));
    }
    Ok(())
}

/// Checks the shape of `balances` and that every balance is positive.
///
/// # Errors
///
/// - [`AmmError::Input`] if the asset count is unsupported.
/// - [`AmmError::Domain`] if any balance is zero.
pub fn validate_balances(balances: &[u128]) -> Result<()> {
    validate_asset_count(balances.len())?;
    if balances.iter().any(|&b| b == 0) {
        return Err(AmmError::Domain("balance must be positive"));
    }
    Ok(())
}

/// Checks that the amplification coefficient is positive.
///
/// # Errors
///
/// Returns [`AmmError::Input`] if `amp` is zero.
pub const fn validate_amplification(amp: u128) -> Result<()> {
    if amp < MIN_AMP {
        return Err(AmmError::Input("amplification must be positive"));
    }
    Ok(())
}

/// Checks a trade's asset indices against a pool of `n` assets.
///
/// # Errors
///
/// Returns [`AmmError::Input`] if `i == j` or either index is out of range.
pub const fn validate_pair(i: usize, j: usize, n: usize) -> Result<()> {
    if i == j {
        return Err(AmmError::Input("cannot exchange an asset for itself"));
    }
    if i >= n || j >= n {
        return Err(AmmError::Input("asset index out of range"));
    }
    Ok(())
}

/// Checks that two per-asset vectors line up.
///
/// # Errors
///
/// Returns [`AmmError::Input`] if the lengths differ.
pub const fn validate_same_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(AmmError::Input("per-asset vector length mismatch"));
    }
    Ok(())
}
