//! Trade and imbalance fees.
//!
//! Both fees are charged in basis points against [`FEE_DENOMINATOR`] with
//! truncating division.  The imbalance fee applies the truncations in a
//! fixed order (proportional balance, distance, coefficient, fee) and the
//! results only match on-chain values if that order is kept.

use primitive_types::U256;

use crate::domain::{validate_same_len, FeeRate, ImbalanceFees, FEE_DENOMINATOR};
use crate::error::{AmmError, Result};
use crate::math::{mul_div, to_u128};

/// Fee on a raw swap output: `⌊dy · rate / 10000⌋`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] only if the result cannot be narrowed,
/// which cannot happen for a rate of at most 100%.
///
/// # Examples
///
/// ```
/// use stableswap_core::curve::trade_fee;
/// use stableswap_core::domain::FeeRate;
///
/// let rate = FeeRate::new(100).expect("valid rate");
/// assert_eq!(trade_fee(1_000_001, rate), Ok(10_000));
/// ```
pub fn trade_fee(dy: u128, fee_rate: FeeRate) -> Result<u128> {
    to_u128(fee_rate.apply(U256::from(dy))?)
}

/// Per-asset fees for a liquidity change that moved the pool from
/// `before` (invariant `d_before`) to `after` (invariant `d_after`).
///
/// For each asset `k`, in this order and each step truncating:
///
/// 1. `balanced[k] = d_after · before[k] / d_before`
/// 2. `diff[k] = |after[k] − balanced[k]|`
/// 3. `coefficient = rate · n / (4 · (n − 1))`
/// 4. `fee[k] = diff[k] · coefficient / 10000`
///
/// # Errors
///
/// - [`AmmError::Input`] if `before` and `after` differ in length or the
///   asset count is below two.
/// - [`AmmError::Domain`] if `d_before` is zero.
/// - [`AmmError::Overflow`] if a proportional balance exceeds `u128`.
pub fn imbalance_fees(
    before: &[u128],
    after: &[u128],
    d_before: U256,
    d_after: U256,
    fee_rate: FeeRate,
) -> Result<ImbalanceFees> {
    validate_same_len(before.len(), after.len())?;
    if d_before.is_zero() {
        return Err(AmmError::Domain("invariant must be positive"));
    }
    let coefficient = fee_rate.imbalance_coefficient(before.len())?;
    let denominator = U256::from(FEE_DENOMINATOR);

    let mut balanced = Vec::with_capacity(before.len());
    let mut differences = Vec::with_capacity(before.len());
    let mut fees = Vec::with_capacity(before.len());
    for (&old, &new) in before.iter().zip(after) {
        let ideal = to_u128(mul_div(d_after, U256::from(old), d_before)?)?;
        let diff = new.abs_diff(ideal);
        let fee = to_u128(mul_div(U256::from(diff), coefficient, denominator)?)?;
        balanced.push(ideal);
        differences.push(diff);
        fees.push(fee);
    }

    Ok(ImbalanceFees {
        balanced,
        differences,
        fees,
    })
}
