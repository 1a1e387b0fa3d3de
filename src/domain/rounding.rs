//! Explicit rounding direction for division.

/// Rounding direction for a division.
///
/// Curve formulas always use [`Rounding::Down`].  [`Rounding::Up`] is
/// reserved for amounts the pool charges the user.
///
/// # Examples
///
/// ```
/// use stableswap_core::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(Rounding::default().is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Truncate towards zero (floor).
    #[default]
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
