//! Exact integer primitives over the crate's single working width.
//!
//! All curve math runs on [`U256`].  The only place a wider type appears is
//! the `a · b / c` product, which is carried in a [`U512`] so that the
//! quotient is exact whenever it fits back into 256 bits.
//!
//! Division always truncates toward zero; the curve formulas depend on the
//! exact order in which those truncations happen, so callers sequence the
//! calls explicitly rather than fusing them.
//!
//! | Function | Result |
//! |----------|--------|
//! | [`exact_pow`] | `base^exp` |
//! | [`exact_mul`] | `a · b` |
//! | [`exact_div`] | `⌊a / b⌋` |
//! | [`exact_sum`] | `Σ values` |
//! | [`exact_product`] | `Π values` |
//! | [`mul_div`] | `⌊a · b / c⌋` with a 512-bit intermediate |

use primitive_types::{U256, U512};

use crate::domain::Rounding;
use crate::error::{AmmError, Result};

/// Raises `base` to `exp`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the power exceeds 256 bits.
pub fn exact_pow(base: U256, exp: u32) -> Result<U256> {
    base.checked_pow(U256::from(exp))
        .ok_or(AmmError::Overflow("pow exceeds 256 bits"))
}

/// Multiplies two values.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the product exceeds 256 bits.
pub fn exact_mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b)
        .ok_or(AmmError::Overflow("mul exceeds 256 bits"))
}

/// Truncating division.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `b` is zero.
pub fn exact_div(a: U256, b: U256) -> Result<U256> {
    a.checked_div(b).ok_or(AmmError::DivisionByZero)
}

/// Sums a sequence of values.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the running sum exceeds 256 bits.
pub fn exact_sum<I>(values: I) -> Result<U256>
where
    I: IntoIterator<Item = U256>,
{
    values.into_iter().try_fold(U256::zero(), |acc, v| {
        acc.checked_add(v)
            .ok_or(AmmError::Overflow("sum exceeds 256 bits"))
    })
}

/// Multiplies a sequence of values.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the running product exceeds 256 bits.
pub fn exact_product<I>(values: I) -> Result<U256>
where
    I: IntoIterator<Item = U256>,
{
    values.into_iter().try_fold(U256::one(), exact_mul)
}

/// Computes `⌊a · b / c⌋` without intermediate overflow.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `c` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit 256 bits.
pub fn mul_div(a: U256, b: U256, c: U256) -> Result<U256> {
    mul_div_rounded(a, b, c, Rounding::Down)
}

/// Computes `a · b / c` with an explicit rounding direction.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `c` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit 256 bits.
pub fn mul_div_rounded(a: U256, b: U256, c: U256, rounding: Rounding) -> Result<U256> {
    if c.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let (quotient, remainder) = a.full_mul(b).div_mod(U512::from(c));
    let quotient = if rounding.is_up() && !remainder.is_zero() {
        quotient + U512::one()
    } else {
        quotient
    };
    narrow(quotient)
}

/// Narrows a 512-bit intermediate back to the working width.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `value` needs more than 256 bits.
pub fn narrow(value: U512) -> Result<U256> {
    U256::try_from(value).map_err(|_| AmmError::Overflow("value exceeds 256 bits"))
}

/// Narrows a working value to a token quantity.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `value` needs more than 128 bits.
pub fn to_u128(value: U256) -> Result<u128> {
    u128::try_from(value).map_err(|_| AmmError::Overflow("value exceeds u128"))
}

/// Lifts token quantities into the working width.
#[must_use]
pub fn widen(values: &[u128]) -> Vec<U256> {
    values.iter().copied().map(U256::from).collect()
}
