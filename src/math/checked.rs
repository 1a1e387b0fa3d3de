//! Checked arithmetic mapped onto [`AmmError`].
//!
//! The [`CheckedArithmetic`] trait wraps the `checked_*` operations of the
//! two integer types the crate works with, so that every overflow,
//! underflow or zero division surfaces as a typed error instead of a panic
//! or a silent saturation.
//!
//! # Implementations
//!
//! - `u128`: token balances, deposits, LP supply
//! - [`U256`]: invariant and solver intermediates
//!
//! # Examples
//!
//! ```
//! use stableswap_core::domain::Rounding;
//! use stableswap_core::math::CheckedArithmetic;
//!
//! assert_eq!(7u128.safe_div(&2, Rounding::Up), Ok(4));
//! assert!(0u128.safe_sub(&1).is_err());
//! ```

use primitive_types::U256;

use super::div_round;
use crate::domain::Rounding;
use crate::error::AmmError;

/// Fallible arithmetic with typed errors.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result is not representable.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result is not representable.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError>;
}

// ---------------------------------------------------------------------------
// u128
// ---------------------------------------------------------------------------

impl CheckedArithmetic for u128 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("u128 addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(*other)
            .ok_or(AmmError::Underflow("u128 subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("u128 multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        if *other == 0 {
            return Err(AmmError::DivisionByZero);
        }
        let q = self / other;
        if rounding.is_up() && self % other != 0 {
            // q < u128::MAX whenever there is a remainder.
            Ok(q + 1)
        } else {
            Ok(q)
        }
    }
}

// ---------------------------------------------------------------------------
// U256
// ---------------------------------------------------------------------------

impl CheckedArithmetic for U256 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("U256 addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(*other)
            .ok_or(AmmError::Underflow("U256 subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("U256 multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        div_round(*self, *other, rounding).ok_or(AmmError::DivisionByZero)
    }
}
