//! Value types shared by the solvers and pool operations.
//!
//! - [`FeeRate`]: validated basis-point fee rate
//! - [`Rounding`]: explicit division direction
//! - outcome types returned by every pool operation
//! - boundary validation helpers and asset/amplification limits

mod fee_rate;
mod outcome;
mod rounding;
mod validation;

pub use fee_rate::{FeeRate, FEE_DENOMINATOR};
pub use outcome::{
    AddLiquidityOutcome, ImbalanceFees, RemoveImbalanceOutcome, RemoveLiquidityOutcome,
    SwapOutcome,
};
pub use rounding::Rounding;
pub use validation::{
    validate_amplification, validate_asset_count, validate_balances, validate_pair,
    validate_same_len, MIN_AMP, MIN_ASSETS,
};
