//! Swap solver: the post-trade balance `y` of the output asset.
//!
//! With `D` fixed at the pre-trade invariant and asset `i` credited with
//! `dx`, the invariant equation in the unknown balance `y` of asset `j` is
//! the quadratic
//!
//! ```text
//! Ann · y² + B · y − C = 0
//!
//! B = Ann · S' + D − Ann · D        (may be negative)
//! C = c · Ann
//! c = D^(n+1) / (n^n · Π' x · Ann · n)   (folded with truncation per asset)
//! ```
//!
//! where `S'` and `Π'` range over every asset except `j`.  `c` is folded
//! like the stepwise `D_p`, smallest divisor first; `B` and `C` are held in
//! 512 bits and only `y` is narrowed back to 256.  The default
//! [`YSolveMethod::ClosedForm`] takes the floor of the positive root through
//! an integer square root of a 512-bit discriminant; [`YSolveMethod::Newton`]
//! iterates `y ← (Ann · y² + C) / (2 · Ann · y + B)` from `y = D` and falls
//! back to the closed form if it does not converge.

use primitive_types::{U256, U512};
use tracing::{debug, trace, warn};

use super::{scaled_product, InvariantSolver, Reserves};
use crate::config::{SolverConfig, YSolveMethod};
use crate::domain::validate_pair;
use crate::error::{AmmError, Result};
use crate::math::{exact_mul, narrow, to_u128, CheckedArithmetic};

const SOLVER: &str = "swap";

/// Solution of the swap equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YSolution {
    y: u128,
    invariant: U256,
}

impl YSolution {
    /// New balance of asset `j`, before fees.
    #[must_use]
    pub const fn y(&self) -> u128 {
        self.y
    }

    /// Invariant `D` of the pre-trade balances.
    #[must_use]
    pub const fn invariant(&self) -> U256 {
        self.invariant
    }
}

/// Quadratic coefficients with `B` split into its positive and negative parts.
struct Quadratic {
    ann: U512,
    b_pos: U512,
    b_neg: U512,
    c: U512,
}

/// Solver for the post-trade balance `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapSolver {
    config: SolverConfig,
}

impl SwapSolver {
    /// Creates a solver with the given settings.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solves for the balance of asset `j` after `dx` of asset `i` is added.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Input`] if `i == j`, an index is out of range, or the
    ///   asset count or amplification is invalid.
    /// - [`AmmError::Domain`] if any balance is zero, the trade would drain
    ///   asset `j`, or the root exceeds the current balance of `j`.
    /// - [`AmmError::Overflow`] if `balances[i] + dx` exceeds `u128`, or `c`
    ///   cannot be folded within 256 bits.
    /// - [`AmmError::Convergence`] if the invariant cannot be solved.
    pub fn solve_y(
        &self,
        i: usize,
        j: usize,
        dx: u128,
        balances: &[u128],
        amp: u128,
    ) -> Result<YSolution> {
        validate_pair(i, j, balances.len())?;
        let reserves = Reserves::new(balances, amp)?;
        let x_i = balances[i].safe_add(&dx)?;

        let d = InvariantSolver::new(self.config).solve_reserves(&reserves, reserves.sum())?;
        let quadratic = Self::coefficients(&reserves, balances, i, j, x_i, d)?;

        let y = match self.config.y_method() {
            YSolveMethod::ClosedForm => Self::closed_form(&quadratic)?,
            YSolveMethod::Newton => match self.newton(&quadratic, d) {
                Ok(y) => y,
                Err(err) => {
                    warn!(error = %err, "newton-raphson failed for y, using closed form");
                    Self::closed_form(&quadratic)?
                }
            },
        };

        if y.is_zero() {
            return Err(AmmError::Domain("trade would drain the output asset"));
        }
        let y = to_u128(y)?;
        if y > balances[j] {
            return Err(AmmError::Domain("output would be negative"));
        }
        debug!(i, j, dx = %dx, y = %y, d = %d, "swap solved");
        Ok(YSolution { y, invariant: d })
    }

    fn coefficients(
        reserves: &Reserves,
        balances: &[u128],
        i: usize,
        j: usize,
        x_i: u128,
        d: U256,
    ) -> Result<Quadratic> {
        let n = reserves.n();
        let ann = reserves.ann();

        let mut s = U256::zero();
        let mut divisors = Vec::with_capacity(balances.len());
        for (k, &balance) in balances.iter().enumerate() {
            if k == j {
                continue;
            }
            let x = U256::from(if k == i { x_i } else { balance });
            s = s.safe_add(&x)?;
            divisors.push(exact_mul(x, n)?);
        }
        divisors.push(exact_mul(ann, n)?);
        let c = scaled_product(d, divisors)?;

        // Each product is below 2^512 since both factors fit 256 bits.
        let b_pos = ann.full_mul(s) + U512::from(d);
        let b_neg = ann.full_mul(d);
        Ok(Quadratic {
            ann: U512::from(ann),
            b_pos,
            b_neg,
            c: c.full_mul(ann),
        })
    }

    /// `⌊(−B + ⌊√(B² + 4 · Ann · C)⌋) / (2 · Ann)⌋`.
    fn closed_form(q: &Quadratic) -> Result<U256> {
        let (b, b_negative) = if q.b_pos >= q.b_neg {
            (q.b_pos - q.b_neg, false)
        } else {
            (q.b_neg - q.b_pos, true)
        };
        let four_ann_c = q
            .ann
            .checked_mul(q.c)
            .and_then(|v| v.checked_mul(U512::from(4u8)))
            .ok_or(AmmError::Overflow("y: 4·Ann·C overflow"))?;
        let discriminant = b
            .checked_mul(b)
            .and_then(|v| v.checked_add(four_ann_c))
            .ok_or(AmmError::Overflow("y: discriminant overflow"))?;
        let root = discriminant.integer_sqrt();

        // root ≥ |B| because the discriminant is at least B².
        let numerator = if b_negative {
            root.checked_add(b)
                .ok_or(AmmError::Overflow("y: numerator overflow"))?
        } else {
            root.checked_sub(b)
                .ok_or(AmmError::Underflow("y: numerator underflow"))?
        };
        let two_ann = q.ann * U512::from(2u8);
        narrow(numerator / two_ann)
    }

    /// Newton-Raphson on the quadratic, seeded with `y = D`.
    fn newton(&self, q: &Quadratic, d: U256) -> Result<U256> {
        let tolerance = U256::from(self.config.tolerance());
        let two_ann = q.ann * U512::from(2u8);

        let mut y = d;
        for iteration in 0..self.config.max_iterations() {
            // Ann·y² + C
            let y_wide = U512::from(y);
            let numerator = q
                .ann
                .checked_mul(y_wide)
                .and_then(|v| v.checked_mul(y_wide))
                .and_then(|v| v.checked_add(q.c))
                .ok_or(AmmError::Overflow("y: numerator overflow"))?;
            // 2·Ann·y + B
            let denominator = two_ann
                .checked_mul(y_wide)
                .and_then(|v| v.checked_add(q.b_pos))
                .ok_or(AmmError::Overflow("y: denominator overflow"))?
                .checked_sub(q.b_neg)
                .filter(|v| !v.is_zero())
                .ok_or(AmmError::Convergence {
                    solver: SOLVER,
                    iterations: iteration,
                })?;
            let y_next = narrow(numerator / denominator)?;

            trace!(iteration, y = %y_next, "swap step");

            if y_next.abs_diff(y) <= tolerance {
                return Ok(y_next);
            }
            y = y_next;
        }

        Err(AmmError::Convergence {
            solver: SOLVER,
            iterations: self.config.max_iterations(),
        })
    }
}

/// Solves the post-trade balance `y` with default solver settings.
///
/// # Errors
///
/// See [`SwapSolver::solve_y`].
pub fn solve_y(i: usize, j: usize, dx: u128, balances: &[u128], amp: u128) -> Result<YSolution> {
    SwapSolver::default().solve_y(i, j, dx, balances, amp)
}
