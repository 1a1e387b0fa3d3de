//! Invariant solver: finds `D` such that `F(D) = 0`.
//!
//! # Newton-Raphson
//!
//! With `F'(D) = Ann − 1 + (n + 1) · D_p / D`, the update `D − F / F'`
//! rearranges into an all-integer form:
//!
//! ```text
//! D_next = (Ann · S + n · D_p) · D / ((Ann − 1) · D + (n + 1) · D_p)
//! ```
//!
//! Iteration starts from `S` (or a caller-supplied guess) and stops when
//! `|D_next − D| ≤ tolerance`, returning `D_next`, or when `F(D)` is exactly
//! zero, returning `D`.  A candidate so large that `Ann · D + D_p` leaves
//! 256 bits lies above the root, so it is halved and the iteration goes on.
//!
//! # Fallback
//!
//! If Newton-Raphson exhausts its iteration cap or breaks down (overflow,
//! collapse to zero), the solver retries once with a derivative-free
//! bracketed search: the bracket `[1, S]` is widened until `F(hi) ≥ 0`,
//! tightened with the same initial guess, then shrunk by alternating
//! regula-falsi and bisection steps.  Out-of-range candidates evaluate to a
//! [saturated](Residual::is_saturated) positive residual.  Running out of
//! iterations there surfaces as [`AmmError::Convergence`]; any other error
//! is returned as is.
//!
//! # `D_p` formulation
//!
//! See [`DpFormulation`]: the direct quotient is used while every
//! intermediate provably fits 256 bits, the stepwise product otherwise.
//! The stepwise product divides by the smallest `x_k · n` first, which keeps
//! every partial product at or above `D` and the truncation error near one
//! part in `D`.

use primitive_types::U256;
use tracing::{debug, trace, warn};

use super::Reserves;
use crate::config::SolverConfig;
use crate::error::{AmmError, Result};
use crate::math::{exact_mul, mul_div};

/// Iteration cap of the bracketed fallback.  Every other step halves the
/// bracket, so this bounds any bracket reachable in 256 bits.
const FALLBACK_MAX_ITERATIONS: u32 = 1024;

const SOLVER: &str = "invariant";

/// How `D_p = D^(n+1) / (n^n · Π x)` is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpFormulation {
    /// `D^(n+1) / (n^n · Π x)` with a single truncating division.
    Direct,
    /// `D_p = D`, then `D_p = D_p · D / (x_k · n)` for each asset in
    /// ascending order of `x_k`, every step carried through a 512-bit
    /// product.  A step that would leave 256 bits is deferred behind a
    /// larger divisor.
    Stepwise,
}

impl DpFormulation {
    /// Selects the formulation for invariant candidate `d` over `balances`.
    ///
    /// [`Direct`](Self::Direct) iff `(n + 1) · bits(D) ≤ 256` and
    /// `bits(n^n) + Σ bits(x_i) ≤ 256`, which guarantees neither
    /// `D^(n+1)` nor `n^n · Π x` overflows.
    #[must_use]
    pub fn select(d: U256, balances: &[U256]) -> Self {
        let n = balances.len();
        let Some(n_pow_n) = U256::from(n).checked_pow(U256::from(n)) else {
            return Self::Stepwise;
        };
        let numerator_bits = (n + 1).saturating_mul(d.bits());
        let denominator_bits = balances
            .iter()
            .fold(n_pow_n.bits(), |acc, x| acc.saturating_add(x.bits()));
        if numerator_bits <= 256 && denominator_bits <= 256 {
            Self::Direct
        } else {
            Self::Stepwise
        }
    }
}

/// Signed value of `F(D)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residual {
    negative: bool,
    magnitude: U256,
    saturated: bool,
}

impl Residual {
    pub(crate) fn from_difference(lhs: U256, rhs: U256) -> Self {
        if lhs >= rhs {
            Self {
                negative: false,
                magnitude: lhs - rhs,
                saturated: false,
            }
        } else {
            Self {
                negative: true,
                magnitude: rhs - lhs,
                saturated: false,
            }
        }
    }

    /// `F(D) > 0` with `Ann · D + D_p` beyond 256 bits.
    pub(crate) const fn saturated() -> Self {
        Self {
            negative: false,
            magnitude: U256::MAX,
            saturated: true,
        }
    }

    /// `true` when `F(D) = 0` exactly.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// `true` when `F(D) < 0`, i.e. `D` is below the root.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// `|F(D)|`, or `U256::MAX` when [saturated](Self::is_saturated).
    #[must_use]
    pub const fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// `true` when `D` is so far above the root that `Ann · D + D_p` does
    /// not fit 256 bits.  The sign is still known (positive) but the
    /// magnitude is not.
    #[must_use]
    pub const fn is_saturated(&self) -> bool {
        self.saturated
    }
}

/// Newton-Raphson solver for the invariant `D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvariantSolver {
    config: SolverConfig,
}

impl InvariantSolver {
    /// Creates a solver with the given convergence settings.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Returns the solver's convergence settings.
    #[must_use]
    pub const fn config(&self) -> SolverConfig {
        self.config
    }

    /// Solves for `D` starting from `S = Σ balances`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Input`] if there are fewer than two assets or `amp` is zero.
    /// - [`AmmError::Domain`] if any balance is zero.
    /// - [`AmmError::Overflow`] if `Ann` or `Ann · S` exceeds 256 bits.
    /// - [`AmmError::Convergence`] if both Newton-Raphson and the fallback
    ///   run out of iterations.
    pub fn solve(&self, balances: &[u128], amp: u128) -> Result<U256> {
        let reserves = Reserves::new(balances, amp)?;
        let guess = reserves.sum();
        self.solve_reserves(&reserves, guess)
    }

    /// Solves for `D` starting from `d_initial`, typically the invariant of
    /// a nearby state.
    ///
    /// # Errors
    ///
    /// As [`InvariantSolver::solve`], plus [`AmmError::Input`] if
    /// `d_initial` is zero.
    pub fn solve_from(&self, balances: &[u128], amp: u128, d_initial: U256) -> Result<U256> {
        let reserves = Reserves::new(balances, amp)?;
        if d_initial.is_zero() {
            return Err(AmmError::Input("initial invariant guess must be positive"));
        }
        self.solve_reserves(&reserves, d_initial)
    }

    pub(crate) fn solve_reserves(&self, reserves: &Reserves, guess: U256) -> Result<U256> {
        match self.newton(reserves, guess) {
            Ok((d, iterations)) => {
                debug!(n = reserves.len(), iterations, d = %d, "invariant converged");
                Ok(d)
            }
            Err(err) => {
                warn!(error = %err, "newton-raphson failed for invariant, retrying with bracketed search");
                match self.bracketed(reserves, guess) {
                    Ok((d, iterations)) => {
                        debug!(n = reserves.len(), iterations, d = %d, "invariant converged via fallback");
                        Ok(d)
                    }
                    Err(AmmError::Convergence { .. }) => {
                        warn!("bracketed search ran out of iterations for invariant");
                        Err(AmmError::Convergence {
                            solver: SOLVER,
                            iterations: self.config.max_iterations(),
                        })
                    }
                    Err(fallback_err) => {
                        warn!(error = %fallback_err, "bracketed search failed for invariant");
                        Err(fallback_err)
                    }
                }
            }
        }
    }

    /// Newton-Raphson iteration.  Returns `(D, iterations)`.
    fn newton(&self, reserves: &Reserves, d_initial: U256) -> Result<(U256, u32)> {
        let n = reserves.n();
        let ann = reserves.ann();
        let ann_s = exact_mul(ann, reserves.sum())?;
        let ann_minus_one = ann
            .checked_sub(U256::one())
            .ok_or(AmmError::Underflow("D: Ann − 1 underflow"))?;
        let n_plus_one = n + U256::one();
        let tolerance = U256::from(self.config.tolerance());
        let max_iterations = self.config.max_iterations();

        let mut d = d_initial;
        for iteration in 0..max_iterations {
            let evaluated = reserves.d_p(d).and_then(|d_p| {
                let lhs = exact_mul(ann, d)?
                    .checked_add(d_p)
                    .ok_or(AmmError::Overflow("D: Ann·D + D_p overflow"))?;
                Ok((d_p, lhs))
            });
            let (d_p, lhs) = match evaluated {
                Ok(pair) => pair,
                Err(AmmError::Overflow(_)) => {
                    d = (d / U256::from(2u8)).max(U256::one());
                    trace!(iteration, d = %d, "invariant candidate out of range, halving");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let rhs = ann_s
                .checked_add(d)
                .ok_or(AmmError::Overflow("D: Ann·S + D overflow"))?;
            if lhs == rhs {
                return Ok((d, iteration));
            }

            // (Ann·S + n·D_p) · D / ((Ann − 1)·D + (n + 1)·D_p)
            let numerator = ann_s
                .checked_add(exact_mul(n, d_p)?)
                .ok_or(AmmError::Overflow("D: numerator overflow"))?;
            let denominator = exact_mul(ann_minus_one, d)?
                .checked_add(exact_mul(n_plus_one, d_p)?)
                .ok_or(AmmError::Overflow("D: denominator overflow"))?;
            let d_next = mul_div(numerator, d, denominator)?;
            if d_next.is_zero() {
                return Err(AmmError::Domain("invariant collapsed to zero"));
            }

            trace!(iteration, d = %d_next, "invariant step");

            if d_next.abs_diff(d) <= tolerance {
                return Ok((d_next, iteration + 1));
            }
            d = d_next;
        }

        Err(AmmError::Convergence {
            solver: SOLVER,
            iterations: max_iterations,
        })
    }

    /// Bracketed regula-falsi / bisection search.  Returns `(D, iterations)`.
    fn bracketed(&self, reserves: &Reserves, guess: U256) -> Result<(U256, u32)> {
        let tolerance = U256::from(self.config.tolerance());
        let mut iterations = 0u32;

        let mut lo = U256::one();
        let mut f_lo = reserves.residual(lo)?;
        let mut hi = reserves.sum();
        let mut f_hi = reserves.residual(hi)?;

        while f_hi.is_negative() {
            if iterations >= FALLBACK_MAX_ITERATIONS {
                return Err(AmmError::Convergence {
                    solver: SOLVER,
                    iterations,
                });
            }
            lo = hi;
            f_lo = f_hi;
            hi = hi
                .checked_mul(U256::from(2u8))
                .ok_or(AmmError::Overflow("D: bracket overflow"))?;
            f_hi = reserves.residual(hi)?;
            iterations += 1;
        }
        if f_hi.is_zero() {
            return Ok((hi, iterations));
        }

        if lo < guess && guess < hi {
            let f_guess = reserves.residual(guess)?;
            if f_guess.is_zero() {
                return Ok((guess, iterations));
            }
            if f_guess.is_negative() {
                lo = guess;
                f_lo = f_guess;
            } else {
                hi = guess;
                f_hi = f_guess;
            }
        }

        let mut bisect = false;
        while iterations < FALLBACK_MAX_ITERATIONS {
            let width = hi - lo;
            if width <= tolerance {
                let best = if f_lo.magnitude() < f_hi.magnitude() {
                    lo
                } else {
                    hi
                };
                return Ok((best, iterations));
            }
            iterations += 1;

            let midpoint = lo + width / U256::from(2u8);
            let mid = if bisect {
                midpoint
            } else {
                secant_point(lo, width, f_lo, f_hi)
                    .filter(|m| lo < *m && *m < hi)
                    .unwrap_or(midpoint)
            };
            bisect = !bisect;

            let f_mid = reserves.residual(mid)?;
            trace!(iteration = iterations, lo = %lo, hi = %hi, "invariant bracket step");
            if f_mid.is_zero() {
                return Ok((mid, iterations));
            }
            if f_mid.is_negative() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
                f_hi = f_mid;
            }
        }

        Err(AmmError::Convergence {
            solver: SOLVER,
            iterations,
        })
    }
}

/// Regula-falsi point `lo + width · |F(lo)| / (|F(lo)| + F(hi))`, or
/// `None` when either end is saturated.
fn secant_point(lo: U256, width: U256, f_lo: Residual, f_hi: Residual) -> Option<U256> {
    if f_lo.is_saturated() || f_hi.is_saturated() {
        return None;
    }
    let span = f_lo.magnitude().checked_add(f_hi.magnitude())?;
    let offset = mul_div(width, f_lo.magnitude(), span).ok()?;
    lo.checked_add(offset)
}

/// Computes the invariant `D` with default solver settings.
///
/// # Errors
///
/// See [`InvariantSolver::solve`].
///
/// # Examples
///
/// ```
/// use stableswap_core::curve::compute_d;
/// use stableswap_core::math::U256;
///
/// assert_eq!(compute_d(&[100, 100], 1), Ok(U256::from(200u32)));
/// ```
pub fn compute_d(balances: &[u128], amp: u128) -> Result<U256> {
    InvariantSolver::default().solve(balances, amp)
}

/// Computes the invariant `D` from an initial guess with default settings.
///
/// # Errors
///
/// See [`InvariantSolver::solve_from`].
pub fn compute_d_from(balances: &[u128], amp: u128, d_initial: U256) -> Result<U256> {
    InvariantSolver::default().solve_from(balances, amp, d_initial)
}

/// Evaluates the signed residual `F(d)` for `balances`.
///
/// # Errors
///
/// - [`AmmError::Input`] / [`AmmError::Domain`] on invalid balances or amplification.
/// - [`AmmError::Overflow`] if `Ann · S + d` exceeds 256 bits.  A `d` whose
///   `Ann · d + D_p` exceeds 256 bits yields a saturated positive residual.
pub fn residual(balances: &[u128], amp: u128, d: U256) -> Result<Residual> {
    Reserves::new(balances, amp)?.residual(d)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::YSolveMethod;

    fn d_of(balances: &[u128], amp: u128) -> U256 {
        let Ok(d) = compute_d(balances, amp) else {
            panic!("expected Ok for {balances:?}");
        };
        d
    }

    fn capped(max_iterations: u32) -> InvariantSolver {
        let Ok(cfg) = SolverConfig::new(max_iterations, 1, YSolveMethod::ClosedForm) else {
            panic!("valid config");
        };
        InvariantSolver::new(cfg)
    }

    // -- Known values -----------------------------------------------------------

    #[test]
    fn two_equal_balances_amp_one() {
        assert_eq!(d_of(&[100, 100], 1), U256::from(200u32));
    }

    #[test]
    fn five_asset_pool() {
        let balances = [
            1_000_100_000,
            1_000_200_000,
            1_000_300_000,
            1_000_400_000,
            1_000_500_000,
        ];
        assert_eq!(d_of(&balances, 100), U256::from(5_001_499_999u64));
    }

    #[test]
    fn five_asset_pool_scaled() {
        let balances = [
            100_100_000_000,
            100_200_000_000,
            100_300_000_000,
            100_400_000_000,
            100_500_000_000,
        ];
        assert_eq!(d_of(&balances, 100), U256::from(501_499_999_992u64));
    }

    #[test]
    fn skewed_pools() {
        assert_eq!(d_of(&[1_000, 1_000_000_000, 5], 10), U256::from(2_455_605u32));
        assert_eq!(d_of(&[1, 1_000_000_000_000], 100), U256::from(1_169_152_241u64));
        assert_eq!(
            d_of(&[1_000_000, 3_000_000, 10_000, 700_000], 50),
            U256::from(4_677_815u32)
        );
    }

    #[test]
    fn extreme_skew_solves() {
        // D_p at D = S overflows 256 bits for all of these.
        assert_eq!(
            d_of(&[1_000, 1_000, 10u128.pow(30)], 100),
            U256::from(519_615_242_270_595_713u64)
        );
        assert_eq!(
            d_of(&[1, 1, 10u128.pow(27)], 100),
            U256::from(519_615_242_270_595u64)
        );
        assert_eq!(
            d_of(&[1, 1, 10u128.pow(26)], 100),
            U256::from(164_316_767_251_482u64)
        );
        assert_eq!(
            d_of(&[1, 1, 1, 1, 1, 1, 1, 10u128.pow(38)], 1),
            U256::from(11_218_576_522u64)
        );
    }

    #[test]
    fn extreme_skew_root_is_bracketed() {
        for (balances, amp) in [
            (vec![1_000u128, 1_000, 10u128.pow(30)], 100u128),
            (vec![1, 1, 10u128.pow(27)], 100),
        ] {
            let d = d_of(&balances, amp);
            let Ok(below) = residual(&balances, amp, d - U256::one()) else {
                panic!("expected Ok");
            };
            let Ok(above) = residual(&balances, amp, d + U256::one()) else {
                panic!("expected Ok");
            };
            assert!(below.is_negative(), "{balances:?}");
            assert!(!above.is_negative() && !above.is_zero(), "{balances:?}");
        }
    }

    #[test]
    fn more_than_eight_assets() {
        assert_eq!(d_of(&[1_000; 9], 100), U256::from(9_000u32));
        let ten: Vec<u128> = (1..=10).map(|k| 1_000 * k).collect();
        assert_eq!(d_of(&ten, 200), U256::from(54_999u32));
    }

    // -- Balanced identity --------------------------------------------------------

    #[test]
    fn balanced_pool_is_n_times_v() {
        for n in 2..=12usize {
            for v in [1u128, 7, 1_000, 123_456_789, 10u128.pow(18), 10u128.pow(30)] {
                for amp in [1u128, 100, 1_000_000] {
                    let balances = vec![v; n];
                    assert_eq!(
                        d_of(&balances, amp),
                        U256::from(v) * U256::from(n),
                        "n={n} v={v} A={amp}"
                    );
                }
            }
        }
    }

    #[test]
    fn near_max_balances_use_stepwise_formulation() {
        let v = u128::MAX / 2;
        let balances = vec![v; 8];
        let expected = U256::from(v) * U256::from(8u8);
        assert_eq!(
            DpFormulation::select(expected, &crate::math::widen(&balances)),
            DpFormulation::Stepwise
        );
        assert_eq!(d_of(&balances, 1_000), expected);
    }

    #[test]
    fn formulation_threshold() {
        let small = crate::math::widen(&[1_000, 1_000]);
        assert_eq!(DpFormulation::select(U256::from(2_000u32), &small), DpFormulation::Direct);
        // 3 · 86 bits > 256
        let d = U256::one() << 85;
        assert_eq!(DpFormulation::select(d, &small), DpFormulation::Stepwise);
        // 4 bits (n^n = 4 → 3 bits) + 2 · 127 bits > 256
        let wide = crate::math::widen(&[u128::MAX >> 1, u128::MAX >> 1]);
        assert_eq!(DpFormulation::select(U256::from(4u8), &wide), DpFormulation::Stepwise);
    }

    // -- Fixed point and residual -------------------------------------------------

    #[test]
    fn solve_from_own_result_is_fixed_point() {
        let balances = [1_099_851_988, 1_000_138_007, 1_000_238_001, 1_000_337_994, 1_000_437_988];
        let d = d_of(&balances, 100);
        let Ok(again) = compute_d_from(&balances, 100, d) else {
            panic!("expected Ok");
        };
        assert!(again.abs_diff(d) <= U256::one());
    }

    #[test]
    fn residual_at_solution_is_exact_for_balanced_pool() {
        let Ok(r) = residual(&[100, 100], 1, U256::from(200u32)) else {
            panic!("expected Ok");
        };
        assert!(r.is_zero());
        assert_eq!(r.magnitude(), U256::zero());
    }

    // -- Errors -----------------------------------------------------------------

    #[test]
    fn zero_balance_is_domain_error() {
        assert_eq!(
            compute_d(&[100, 0, 100], 10),
            Err(AmmError::Domain("balance must be positive"))
        );
    }

    #[test]
    fn shape_and_amp_are_input_errors() {
        assert!(matches!(compute_d(&[100], 10), Err(AmmError::Input(_))));
        assert!(matches!(compute_d(&[1, 1], 0), Err(AmmError::Input(_))));
    }

    #[test]
    fn unrepresentable_pools_overflow() {
        // 60^60 does not fit 256 bits.
        assert!(matches!(compute_d(&[1; 60], 1), Err(AmmError::Overflow(_))));
        // Ann · S needs about 259 bits.
        assert!(matches!(
            compute_d(&[u128::MAX, u128::MAX], u128::MAX),
            Err(AmmError::Overflow(_))
        ));
    }

    #[test]
    fn zero_initial_guess_rejected() {
        assert!(matches!(
            compute_d_from(&[1, 1], 1, U256::zero()),
            Err(AmmError::Input(_))
        ));
    }

    // -- Fallback ---------------------------------------------------------------

    #[test]
    fn newton_alone_reports_convergence_failure() {
        let Ok(reserves) = Reserves::new(&[1_000, 1_000_000_000, 5], 10) else {
            panic!("expected Ok");
        };
        let solver = capped(1);
        assert_eq!(
            solver.newton(&reserves, reserves.sum()),
            Err(AmmError::Convergence {
                solver: "invariant",
                iterations: 1
            })
        );
    }

    #[test]
    fn fallback_recovers_when_newton_is_capped() {
        let cases: [(&[u128], u128); 3] = [
            (&[1_000, 1_000_000_000, 5], 10),
            (&[1, 1_000_000_000_000], 100),
            (&[1_000_000, 3_000_000, 10_000, 700_000], 50),
        ];
        for (balances, amp) in cases {
            let newton = d_of(balances, amp);
            let Ok(fallback) = capped(1).solve(balances, amp) else {
                panic!("fallback should converge for {balances:?}");
            };
            assert!(
                fallback.abs_diff(newton) <= U256::from(2u8),
                "newton={newton} fallback={fallback}"
            );
        }
    }

    #[test]
    fn bracketed_search_starts_from_saturated_upper_end() {
        let Ok(reserves) = Reserves::new(&[1_000, 1_000, 10u128.pow(30)], 100) else {
            panic!("expected Ok");
        };
        let Ok(f_sum) = reserves.residual(reserves.sum()) else {
            panic!("expected Ok");
        };
        assert!(f_sum.is_saturated());
        let Ok((d, _)) = capped(255).bracketed(&reserves, reserves.sum()) else {
            panic!("expected Ok");
        };
        assert_eq!(d, U256::from(519_615_242_270_595_713u64));
    }

    #[test]
    fn newton_halves_out_of_range_candidates() {
        let Ok(reserves) = Reserves::new(&[1, 1, 10u128.pow(27)], 100) else {
            panic!("expected Ok");
        };
        let Ok((d, _)) = capped(255).newton(&reserves, reserves.sum()) else {
            panic!("expected Ok");
        };
        assert_eq!(d, U256::from(519_615_242_270_595u64));
    }

    #[test]
    fn bracketed_search_matches_known_root() {
        let Ok(reserves) = Reserves::new(&[1_000, 1_000_000_000, 5], 10) else {
            panic!("expected Ok");
        };
        let Ok((d, iterations)) = capped(255).bracketed(&reserves, reserves.sum()) else {
            panic!("expected Ok");
        };
        assert_eq!(d, U256::from(2_455_605u32));
        assert!(iterations <= FALLBACK_MAX_ITERATIONS);
    }
}
