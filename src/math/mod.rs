//! Exact integer arithmetic for the curve math.
//!
//! Every computation runs on one statically chosen type, [`U256`], with a
//! 512-bit widening multiply for `a · b / c` products.  There is no
//! floating-point path.
//!
//! - [`CheckedArithmetic`]: overflow-safe operations returning [`AmmError`](crate::error::AmmError)
//! - [`div_round`]: division with an explicit [`Rounding`](crate::domain::Rounding)
//! - `exact_*` and [`mul_div`]: the primitives the solvers are written in

mod checked;
mod precision;
mod rounding;

pub use checked::CheckedArithmetic;
pub use precision::{
    exact_div, exact_mul, exact_pow, exact_product, exact_sum, mul_div, mul_div_rounded, narrow,
    to_u128, widen,
};
pub use rounding::div_round;

pub use primitive_types::{U256, U512};
