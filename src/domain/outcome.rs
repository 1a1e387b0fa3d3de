//! Outcomes of pool operations.
//!
//! Every operation returns a full breakdown instead of a single number so
//! that callers can reconcile each intermediate value against an on-chain
//! trace.  Outcomes are plain data; applying one to pool state is the
//! caller's decision.

use primitive_types::U256;

/// Per-asset imbalance fee breakdown for a liquidity change.
///
/// For each asset `k`:
///
/// ```text
/// balanced[k]    = D_after · before[k] / D_before
/// differences[k] = |after[k] − balanced[k]|
/// fees[k]        = differences[k] · coefficient / 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImbalanceFees {
    pub(crate) balanced: Vec<u128>,
    pub(crate) differences: Vec<u128>,
    pub(crate) fees: Vec<u128>,
}

impl ImbalanceFees {
    /// Balances the pool would hold had the change been perfectly proportional.
    #[must_use]
    pub fn balanced(&self) -> &[u128] {
        &self.balanced
    }

    /// Absolute distance of each asset from its proportional balance.
    #[must_use]
    pub fn differences(&self) -> &[u128] {
        &self.differences
    }

    /// Fee charged per asset.
    #[must_use]
    pub fn fees(&self) -> &[u128] {
        &self.fees
    }

    /// Sum of all per-asset fees, saturating at `u128::MAX`.
    #[must_use]
    pub fn total(&self) -> u128 {
        self.fees.iter().fold(0u128, |acc, f| acc.saturating_add(*f))
    }
}

/// Outcome of an exchange of `amount_in` of asset `i` for asset `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub(crate) i: usize,
    pub(crate) j: usize,
    pub(crate) amount_in: u128,
    pub(crate) new_balance_out: u128,
    pub(crate) gross_out: u128,
    pub(crate) fee: u128,
    pub(crate) amount_out: u128,
    pub(crate) invariant: U256,
}

impl SwapOutcome {
    /// Index of the asset sold.
    #[must_use]
    pub const fn asset_in(&self) -> usize {
        self.i
    }

    /// Index of the asset bought.
    #[must_use]
    pub const fn asset_out(&self) -> usize {
        self.j
    }

    /// Amount of asset `i` paid in.
    #[must_use]
    pub const fn amount_in(&self) -> u128 {
        self.amount_in
    }

    /// Solved balance `y` of asset `j` after the trade, before fees.
    #[must_use]
    pub const fn new_balance_out(&self) -> u128 {
        self.new_balance_out
    }

    /// Raw output `dy = balance_j − y`.
    #[must_use]
    pub const fn gross_out(&self) -> u128 {
        self.gross_out
    }

    /// Trade fee taken from the raw output.
    #[must_use]
    pub const fn fee(&self) -> u128 {
        self.fee
    }

    /// Net amount delivered to the trader: `dy − fee`.
    #[must_use]
    pub const fn amount_out(&self) -> u128 {
        self.amount_out
    }

    /// Invariant of the pre-trade balances.
    #[must_use]
    pub const fn invariant(&self) -> U256 {
        self.invariant
    }
}

/// Outcome of a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityOutcome {
    pub(crate) balances_after_deposit: Vec<u128>,
    pub(crate) imbalance: ImbalanceFees,
    pub(crate) final_balances: Vec<u128>,
    pub(crate) d0: U256,
    pub(crate) d1: U256,
    pub(crate) d2: U256,
    pub(crate) minted: u128,
    pub(crate) fee_share: u128,
}

impl AddLiquidityOutcome {
    /// Balances with the deposits applied, before fees.
    #[must_use]
    pub fn balances_after_deposit(&self) -> &[u128] {
        &self.balances_after_deposit
    }

    /// Imbalance fee breakdown.
    #[must_use]
    pub const fn imbalance(&self) -> &ImbalanceFees {
        &self.imbalance
    }

    /// Balances after deposits and fees.
    #[must_use]
    pub fn final_balances(&self) -> &[u128] {
        &self.final_balances
    }

    /// Invariant before the deposit.
    #[must_use]
    pub const fn d0(&self) -> U256 {
        self.d0
    }

    /// Invariant after the deposit, before fees.
    #[must_use]
    pub const fn d1(&self) -> U256 {
        self.d1
    }

    /// Invariant of the final balances.
    #[must_use]
    pub const fn d2(&self) -> U256 {
        self.d2
    }

    /// LP tokens minted for the deposit.
    #[must_use]
    pub const fn minted(&self) -> u128 {
        self.minted
    }

    /// LP tokens withheld because of the imbalance fee: the mint a fee-free
    /// deposit (`D1 − D0`) would have earned, minus [`minted`](Self::minted).
    #[must_use]
    pub const fn fee_share(&self) -> u128 {
        self.fee_share
    }
}

/// Outcome of a proportional withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityOutcome {
    pub(crate) returns: Vec<u128>,
    pub(crate) remaining: Vec<u128>,
    pub(crate) burned: u128,
}

impl RemoveLiquidityOutcome {
    /// Amount of each asset paid out.
    #[must_use]
    pub fn returns(&self) -> &[u128] {
        &self.returns
    }

    /// Balances left in the pool.
    #[must_use]
    pub fn remaining(&self) -> &[u128] {
        &self.remaining
    }

    /// LP tokens burned.
    #[must_use]
    pub const fn burned(&self) -> u128 {
        self.burned
    }
}

/// Outcome of a withdrawal of arbitrary per-asset amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveImbalanceOutcome {
    pub(crate) balances_after_withdrawal: Vec<u128>,
    pub(crate) imbalance: ImbalanceFees,
    pub(crate) final_balances: Vec<u128>,
    pub(crate) d0: U256,
    pub(crate) d1: U256,
    pub(crate) d2: U256,
    pub(crate) burned: u128,
    pub(crate) fee_share: u128,
}

impl RemoveImbalanceOutcome {
    /// Balances with the withdrawals applied, before fees.
    #[must_use]
    pub fn balances_after_withdrawal(&self) -> &[u128] {
        &self.balances_after_withdrawal
    }

    /// Imbalance fee breakdown.
    #[must_use]
    pub const fn imbalance(&self) -> &ImbalanceFees {
        &self.imbalance
    }

    /// Balances after withdrawals and fees.
    #[must_use]
    pub fn final_balances(&self) -> &[u128] {
        &self.final_balances
    }

    /// Invariant before the withdrawal.
    #[must_use]
    pub const fn d0(&self) -> U256 {
        self.d0
    }

    /// Invariant after the withdrawal, before fees.
    #[must_use]
    pub const fn d1(&self) -> U256 {
        self.d1
    }

    /// Invariant of the final balances.
    #[must_use]
    pub const fn d2(&self) -> U256 {
        self.d2
    }

    /// LP tokens burned, rounded up.
    #[must_use]
    pub const fn burned(&self) -> u128 {
        self.burned
    }

    /// Part of [`burned`](Self::burned) attributable to the imbalance fee.
    #[must_use]
    pub const fn fee_share(&self) -> u128 {
        self.fee_share
    }
}
