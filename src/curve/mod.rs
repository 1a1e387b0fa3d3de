//! StableSwap curve math for `n` assets.
//!
//! # Invariant
//!
//! ```text
//! F(D) = Ann · D + D_p − Ann · S − D = 0
//!
//! Ann = A · n^n
//! S   = Σ x_i
//! D_p = D^(n+1) / (n^n · Π x_i)
//! ```
//!
//! `F` is strictly increasing in `D` for positive balances, so the root is
//! unique.  [`InvariantSolver`] finds it, [`SwapSolver`] solves the same
//! equation for one balance with `D` held fixed, and the [`fees`] functions
//! turn both into trade and imbalance fees.
//!
//! # Amplification Behaviour
//!
//! | A | Curve |
//! |---|-------|
//! | 1 | close to constant product |
//! | 50–5 000 | low slippage near balance |
//! | → ∞ | constant sum (1:1 swaps) |

pub mod fees;
mod invariant;
mod swap;

pub use fees::{imbalance_fees, trade_fee};
pub use invariant::{compute_d, compute_d_from, residual, DpFormulation, InvariantSolver, Residual};
pub use swap::{solve_y, SwapSolver, YSolution};

use primitive_types::U256;

use crate::domain::{validate_amplification, validate_balances};
use crate::error::{AmmError, Result};
use crate::math::{exact_mul, exact_pow, exact_sum, mul_div, widen};

/// Computes `Ann = A · n^n`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the product exceeds 256 bits.
pub fn ann(amp: u128, n: usize) -> Result<U256> {
    let n_u32 = u32::try_from(n).map_err(|_| AmmError::Input("asset count too large"))?;
    let n_pow_n = exact_pow(U256::from(n), n_u32)?;
    exact_mul(U256::from(amp), n_pow_n)
}

/// Validated balances lifted into the working width, with the quantities
/// every evaluation of `F` needs.
#[derive(Debug, Clone)]
pub(crate) struct Reserves {
    xs: Vec<U256>,
    n: U256,
    ann: U256,
    sum: U256,
}

impl Reserves {
    /// Validates `balances` and `amp` and precomputes `n`, `Ann` and `S`.
    pub(crate) fn new(balances: &[u128], amp: u128) -> Result<Self> {
        validate_balances(balances)?;
        validate_amplification(amp)?;
        let xs = widen(balances);
        let sum = exact_sum(xs.iter().copied())?;
        Ok(Self {
            n: U256::from(balances.len()),
            ann: ann(amp, balances.len())?,
            sum,
            xs,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.xs.len()
    }

    pub(crate) const fn n(&self) -> U256 {
        self.n
    }

    pub(crate) const fn ann(&self) -> U256 {
        self.ann
    }

    pub(crate) const fn sum(&self) -> U256 {
        self.sum
    }

    /// `D_p = D^(n+1) / (n^n · Π x)`, through the formulation that is exact
    /// for this magnitude.
    pub(crate) fn d_p(&self, d: U256) -> Result<U256> {
        match DpFormulation::select(d, &self.xs) {
            DpFormulation::Direct => {
                let len = u32::try_from(self.xs.len())
                    .map_err(|_| AmmError::Input("asset count too large"))?;
                let numerator = exact_pow(d, len + 1)?;
                let n_pow_n = exact_pow(self.n, len)?;
                let denominator = self
                    .xs
                    .iter()
                    .try_fold(n_pow_n, |acc, x| exact_mul(acc, *x))?;
                Ok(numerator / denominator)
            }
            DpFormulation::Stepwise => {
                let divisors = self
                    .xs
                    .iter()
                    .map(|x| exact_mul(*x, self.n))
                    .collect::<Result<Vec<_>>>()?;
                scaled_product(d, divisors)
            }
        }
    }

    /// `Ann · D + D_p`, the side of `F` that grows with `D`.
    pub(crate) fn growing_side(&self, d: U256) -> Result<U256> {
        let d_p = self.d_p(d)?;
        exact_mul(self.ann, d)?
            .checked_add(d_p)
            .ok_or(AmmError::Overflow("F: Ann·D + D_p overflow"))
    }

    /// Signed residual `F(D)`.
    ///
    /// `Ann · S + D` must fit; if only `Ann · D + D_p` leaves 256 bits the
    /// residual is [saturated](Residual::is_saturated) and positive.
    pub(crate) fn residual(&self, d: U256) -> Result<Residual> {
        let rhs = exact_mul(self.ann, self.sum)?
            .checked_add(d)
            .ok_or(AmmError::Overflow("F: Ann·S + D overflow"))?;
        match self.growing_side(d) {
            Ok(lhs) => Ok(Residual::from_difference(lhs, rhs)),
            Err(AmmError::Overflow(_)) => Ok(Residual::saturated()),
            Err(err) => Err(err),
        }
    }
}

/// `d · Π (d / v)` over `divisors`, truncating after every step.
///
/// Divisors are taken smallest first, so the running value climbs before
/// it is cut down.  When the next step would leave 256 bits the smallest
/// divisor that keeps it in range is taken instead.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] once no remaining divisor keeps the
/// running value within 256 bits.
pub(crate) fn scaled_product(d: U256, mut divisors: Vec<U256>) -> Result<U256> {
    divisors.sort_unstable();
    let mut acc = d;
    while !divisors.is_empty() {
        let (position, next) = divisors
            .iter()
            .enumerate()
            .find_map(|(k, v)| mul_div(acc, d, *v).ok().map(|next| (k, next)))
            .ok_or(AmmError::Overflow("scaled product exceeds 256 bits"))?;
        divisors.remove(position);
        acc = next;
    }
    Ok(acc)
}
