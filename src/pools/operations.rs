//! Stateless pool operations.
//!
//! Each operation is a pure function of its arguments: it validates every
//! input at the boundary, runs the solvers, and returns a full outcome.
//! Nothing is committed anywhere, so a failed call has no effect.
//!
//! | Operation | Invariants solved |
//! |-----------|-------------------|
//! | [`add_liquidity`] | `D0` (before), `D1` (after deposit), `D2` (after fees) |
//! | [`exchange`] | `D` (before) |
//! | [`remove_liquidity`] | none |
//! | [`remove_liquidity_imbalance`] | `D0`, `D1` (after withdrawal), `D2` (after fees) |

use primitive_types::U256;
use tracing::debug;

use crate::config::SolverConfig;
use crate::curve::{imbalance_fees, trade_fee, InvariantSolver, SwapSolver};
use crate::domain::{
    validate_amplification, validate_asset_count, validate_balances, validate_pair,
    validate_same_len, AddLiquidityOutcome, FeeRate, RemoveImbalanceOutcome,
    RemoveLiquidityOutcome, Rounding, SwapOutcome,
};
use crate::error::{AmmError, Result};
use crate::math::{mul_div, mul_div_rounded, to_u128, CheckedArithmetic};

/// Deposits `deposits` into a pool holding `balances`.
///
/// 1. `after = balances + deposits`
/// 2. `D0 = D(balances)`, `D1 = D(after)` seeded with `D0`
/// 3. imbalance fees between `balances` and `after`
/// 4. `final = after − fees`, `D2 = D(final)` seeded with `D1`
/// 5. `minted = lp_supply · (D2 − D0) / D0`, or `D2` for an empty supply
///
/// # Errors
///
/// - [`AmmError::Input`] on a length mismatch, invalid amplification, or
///   when every deposit is zero.
/// - [`AmmError::Domain`] if any balance is zero.
/// - [`AmmError::Overflow`] if a deposit overflows a balance.
/// - [`AmmError::Underflow`] if fees push the invariant below `D0`.
/// - [`AmmError::Convergence`] if an invariant cannot be solved.
pub fn add_liquidity(
    balances: &[u128],
    deposits: &[u128],
    amp: u128,
    fee_rate: FeeRate,
    lp_supply: u128,
    solver: &SolverConfig,
) -> Result<AddLiquidityOutcome> {
    validate_balances(balances)?;
    validate_same_len(balances.len(), deposits.len())?;
    validate_amplification(amp)?;
    if deposits.iter().all(|&d| d == 0) {
        return Err(AmmError::Input("deposit must include at least one asset"));
    }

    let after = balances
        .iter()
        .zip(deposits)
        .map(|(b, d)| b.safe_add(d))
        .collect::<Result<Vec<u128>>>()?;

    let invariant = InvariantSolver::new(*solver);
    let d0 = invariant.solve(balances, amp)?;
    let d1 = invariant.solve_from(&after, amp, d0)?;

    let imbalance = imbalance_fees(balances, &after, d0, d1, fee_rate)?;
    let final_balances = after
        .iter()
        .zip(imbalance.fees())
        .map(|(a, f)| a.safe_sub(f))
        .collect::<Result<Vec<u128>>>()?;
    let d2 = invariant.solve_from(&final_balances, amp, d1)?;

    let (minted, fee_share) = if lp_supply == 0 {
        (to_u128(d2)?, 0)
    } else {
        let supply = U256::from(lp_supply);
        let minted = to_u128(mul_div(supply, d2.safe_sub(&d0)?, d0)?)?;
        let without_fee = to_u128(mul_div(supply, d1.safe_sub(&d0)?, d0)?)?;
        (minted, without_fee.saturating_sub(minted))
    };

    debug!(
        d0 = %d0,
        d1 = %d1,
        d2 = %d2,
        minted = %minted,
        fees = %imbalance.total(),
        "liquidity added"
    );

    Ok(AddLiquidityOutcome {
        balances_after_deposit: after,
        imbalance,
        final_balances,
        d0,
        d1,
        d2,
        minted,
        fee_share,
    })
}

/// Sells `dx` of asset `i` for asset `j`.
///
/// `y` comes from the [`SwapSolver`]; the raw output `dy = balances[j] − y`
/// is charged [`trade_fee`] and the remainder is paid out.
///
/// # Errors
///
/// - [`AmmError::Input`] if `i == j` or an index is out of range.
/// - [`AmmError::Domain`] if a balance is zero or the output would be
///   negative or drain asset `j`.
/// - [`AmmError::Convergence`] if the invariant cannot be solved.
pub fn exchange(
    i: usize,
    j: usize,
    dx: u128,
    balances: &[u128],
    amp: u128,
    fee_rate: FeeRate,
    solver: &SolverConfig,
) -> Result<SwapOutcome> {
    validate_pair(i, j, balances.len())?;

    let solution = SwapSolver::new(*solver).solve_y(i, j, dx, balances, amp)?;
    let y = solution.y();
    let gross_out = balances[j]
        .checked_sub(y)
        .ok_or(AmmError::Domain("output would be negative"))?;
    let fee = trade_fee(gross_out, fee_rate)?;
    let amount_out = gross_out.safe_sub(&fee)?;

    debug!(i, j, dx = %dx, dy = %gross_out, fee = %fee, "exchange");

    Ok(SwapOutcome {
        i,
        j,
        amount_in: dx,
        new_balance_out: y,
        gross_out,
        fee,
        amount_out,
        invariant: solution.invariant(),
    })
}

/// Burns `remove_lp` of `lp_supply` for a proportional share of every asset.
///
/// `returns[k] = ⌊balances[k] · remove_lp / lp_supply⌋` and
/// `remaining[k] = balances[k] − returns[k]`.
///
/// # Errors
///
/// - [`AmmError::Input`] if the asset count is unsupported, `lp_supply` is
///   zero, or `remove_lp > lp_supply`.
pub fn remove_liquidity(
    balances: &[u128],
    lp_supply: u128,
    remove_lp: u128,
) -> Result<RemoveLiquidityOutcome> {
    validate_asset_count(balances.len())?;
    if lp_supply == 0 {
        return Err(AmmError::Input("LP supply is zero"));
    }
    if remove_lp > lp_supply {
        return Err(AmmError::Input("cannot remove more LP than supplied"));
    }

    let supply = U256::from(lp_supply);
    let share = U256::from(remove_lp);
    let mut returns = Vec::with_capacity(balances.len());
    let mut remaining = Vec::with_capacity(balances.len());
    for &balance in balances {
        let out = to_u128(mul_div(U256::from(balance), share, supply)?)?;
        returns.push(out);
        remaining.push(balance.safe_sub(&out)?);
    }

    debug!(burned = %remove_lp, "liquidity removed");

    Ok(RemoveLiquidityOutcome {
        returns,
        remaining,
        burned: remove_lp,
    })
}

/// Withdraws arbitrary per-asset amounts, burning LP for the invariant lost
/// plus the imbalance fee.
///
/// Mirrors [`add_liquidity`] with `after = balances − withdrawals`; the LP
/// burned is `⌈lp_supply · (D0 − D2) / D0⌉`, rounded against the user.
///
/// # Errors
///
/// - [`AmmError::Input`] on a length mismatch, invalid amplification, a
///   zero `lp_supply`, an all-zero withdrawal, or a burn above `lp_supply`.
/// - [`AmmError::Domain`] if a balance is zero or a withdrawal (plus fees)
///   would empty an asset.
/// - [`AmmError::Convergence`] if an invariant cannot be solved.
pub fn remove_liquidity_imbalance(
    balances: &[u128],
    withdrawals: &[u128],
    amp: u128,
    fee_rate: FeeRate,
    lp_supply: u128,
    solver: &SolverConfig,
) -> Result<RemoveImbalanceOutcome> {
    validate_balances(balances)?;
    validate_same_len(balances.len(), withdrawals.len())?;
    validate_amplification(amp)?;
    if lp_supply == 0 {
        return Err(AmmError::Input("LP supply is zero"));
    }
    if withdrawals.iter().all(|&w| w == 0) {
        return Err(AmmError::Input("withdrawal must include at least one asset"));
    }
    if balances.iter().zip(withdrawals).any(|(b, w)| w >= b) {
        return Err(AmmError::Domain("withdrawal would empty an asset"));
    }

    let after = balances
        .iter()
        .zip(withdrawals)
        .map(|(b, w)| b.safe_sub(w))
        .collect::<Result<Vec<u128>>>()?;

    let invariant = InvariantSolver::new(*solver);
    let d0 = invariant.solve(balances, amp)?;
    let d1 = invariant.solve_from(&after, amp, d0)?;

    let imbalance = imbalance_fees(balances, &after, d0, d1, fee_rate)?;
    let final_balances = after
        .iter()
        .zip(imbalance.fees())
        .map(|(a, f)| {
            a.checked_sub(*f)
                .filter(|v| *v > 0)
                .ok_or(AmmError::Domain("withdrawal fees would empty an asset"))
        })
        .collect::<Result<Vec<u128>>>()?;
    let d2 = invariant.solve_from(&final_balances, amp, d1)?;

    let supply = U256::from(lp_supply);
    let burned = to_u128(mul_div_rounded(supply, d0.safe_sub(&d2)?, d0, Rounding::Up)?)?;
    if burned > lp_supply {
        return Err(AmmError::Input("withdrawal exceeds LP supply"));
    }
    let without_fee = to_u128(mul_div(supply, d0.safe_sub(&d1)?, d0)?)?;

    debug!(
        d0 = %d0,
        d1 = %d1,
        d2 = %d2,
        burned = %burned,
        fees = %imbalance.total(),
        "imbalanced liquidity removed"
    );

    Ok(RemoveImbalanceOutcome {
        balances_after_withdrawal: after,
        imbalance,
        final_balances,
        d0,
        d1,
        d2,
        burned,
        fee_share: burned.saturating_sub(without_fee),
    })
}
