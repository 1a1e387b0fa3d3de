//! Rounding-aware division on the working width.
//!
//! Curve formulas always truncate.  Pool accounting occasionally has to
//! round against the user instead:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Tokens paid out, LP minted | [`Rounding::Down`] |
//! | LP burned for an imbalanced withdrawal | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use primitive_types::U256;
//! use stableswap_core::domain::Rounding;
//! use stableswap_core::math::div_round;
//!
//! let ten = U256::from(10u8);
//! let three = U256::from(3u8);
//! assert_eq!(div_round(ten, three, Rounding::Down), Some(U256::from(3u8)));
//! assert_eq!(div_round(ten, three, Rounding::Up), Some(U256::from(4u8)));
//! assert_eq!(div_round(ten, U256::zero(), Rounding::Down), None);
//! ```

use primitive_types::U256;

use crate::domain::Rounding;

/// Divides `numerator` by `denominator` in the given direction.
///
/// Returns [`None`] if `denominator` is zero.  The ceiling is computed from
/// the remainder, so it never overflows even at [`U256::MAX`].
#[must_use]
pub fn div_round(numerator: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let (q, r) = numerator.div_mod(denominator);
    match rounding {
        Rounding::Down => Some(q),
        // q < MAX whenever r != 0, so the increment cannot wrap.
        Rounding::Up if !r.is_zero() => Some(q + U256::one()),
        Rounding::Up => Some(q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u128) -> U256 {
        U256::from(v)
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(div_round(u(1), U256::zero(), Rounding::Down), None);
        assert_eq!(div_round(U256::zero(), U256::zero(), Rounding::Up), None);
    }

    #[test]
    fn exact_quotient_ignores_direction() {
        assert_eq!(div_round(u(100), u(10), Rounding::Down), Some(u(10)));
        assert_eq!(div_round(u(100), u(10), Rounding::Up), Some(u(10)));
    }

    #[test]
    fn remainder_rounds_by_direction() {
        assert_eq!(div_round(u(9), u(10), Rounding::Down), Some(U256::zero()));
        assert_eq!(div_round(u(9), u(10), Rounding::Up), Some(u(1)));
    }

    #[test]
    fn max_numerator() {
        assert_eq!(div_round(U256::MAX, u(1), Rounding::Up), Some(U256::MAX));
        let half = U256::MAX / u(2);
        assert_eq!(div_round(U256::MAX, half, Rounding::Down), Some(u(2)));
        assert_eq!(div_round(U256::MAX, half, Rounding::Up), Some(u(3)));
    }
}
