//! Fee rate expressed in basis points.

use core::fmt;

use primitive_types::U256;

use crate::error::{AmmError, Result};
use crate::math::{exact_mul, mul_div};

/// Denominator for basis-point fees: 10 000 bp = 100%.
pub const FEE_DENOMINATOR: u32 = 10_000;

/// A fee rate in basis points (1 bp = 0.01%).
///
/// Only `0..=10_000` is accepted; the rate is a plain value passed to every
/// operation that charges a fee, never shared mutable state.
///
/// # Examples
///
/// ```
/// use stableswap_core::domain::FeeRate;
///
/// let rate = FeeRate::new(100).expect("valid rate");
/// assert_eq!(rate.get(), 100);
/// assert_eq!(rate.to_string(), "100bp");
/// assert!(FeeRate::new(10_001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct FeeRate(u32);

impl FeeRate {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(FEE_DENOMINATOR);

    /// Creates a fee rate from basis points.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Input`] if `bps` exceeds 10 000.
    pub const fn new(bps: u32) -> Result<Self> {
        if bps > FEE_DENOMINATOR {
            return Err(AmmError::Input("fee rate exceeds 10000 bp"));
        }
        Ok(Self(bps))
    }

    /// Returns the rate in basis points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` for a zero rate.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Computes `⌊amount · rate / 10000⌋`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the quotient exceeds 256 bits.
    pub fn apply(&self, amount: U256) -> Result<U256> {
        mul_div(amount, U256::from(self.0), U256::from(FEE_DENOMINATOR))
    }

    /// Per-asset rate charged on imbalanced liquidity changes:
    /// `⌊rate · n / (4 · (n − 1))⌋`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Input`] if `n < 2`.
    pub fn imbalance_coefficient(&self, n: usize) -> Result<U256> {
        if n < 2 {
            return Err(AmmError::Input("imbalance fee needs at least two assets"));
        }
        let numerator = exact_mul(U256::from(self.0), U256::from(n))?;
        let denominator = exact_mul(U256::from(4u8), U256::from(n - 1))?;
        Ok(numerator / denominator)
    }
}

impl TryFrom<u32> for FeeRate {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self> {
        Self::new(bps)
    }
}

impl From<FeeRate> for u32 {
    fn from(rate: FeeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
