//! # StableSwap Core
//!
//! Integer-exact StableSwap math for pools of two or more pegged assets:
//! the invariant `D`, the post-trade balance `y`, trade and imbalance fees,
//! and the liquidity operations built on them.
//!
//! All arithmetic runs on unsigned 256-bit integers
//! ([`U256`](math::U256)) with a 512-bit widening multiply for `a · b / c`.
//! Every division truncates, so results reproduce on-chain values to the
//! unit.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize` / `Deserialize` for configuration types |
//!
//! # Quick Start
//!
//! ## Stateless math
//!
//! ```rust
//! use stableswap_core::config::SolverConfig;
//! use stableswap_core::curve::compute_d;
//! use stableswap_core::domain::FeeRate;
//! use stableswap_core::pools::exchange;
//!
//! let balances = [1_000_000u128, 1_000_000];
//! let d = compute_d(&balances, 100).expect("solvable");
//! assert_eq!(d.as_u128(), 2_000_000);
//!
//! let fee = FeeRate::new(4).expect("valid rate"); // 0.04%
//! let out = exchange(0, 1, 1_000, &balances, 100, fee, &SolverConfig::default())
//!     .expect("swap succeeded");
//! assert!(out.amount_out() > 0 && out.amount_out() <= 1_000);
//! ```
//!
//! ## Stateful pool
//!
//! ```rust
//! use stableswap_core::config::StableSwapConfig;
//! use stableswap_core::domain::FeeRate;
//! use stableswap_core::pools::StableSwapPool;
//! use stableswap_core::traits::{FromConfig, LiquidityPool, SwapPool};
//!
//! let fee = FeeRate::new(100).expect("valid rate");
//! let config = StableSwapConfig::new(100, fee, vec![1_000_000, 1_000_000, 1_000_000])
//!     .expect("valid config");
//! let mut pool = StableSwapPool::from_config(&config).expect("pool created");
//!
//! let minted = pool.add_liquidity(&[10_000, 0, 0]).expect("deposit").minted();
//! assert!(minted > 0);
//!
//! let swap = pool.exchange(1, 2, 5_000).expect("swap");
//! assert_eq!(pool.balances()[2], swap.new_balance_out());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │     math     │  U256 / U512 exact arithmetic, mul_div
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    curve     │  InvariantSolver (D), SwapSolver (y), fees
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    pools     │  stateless operations, StableSwapPool
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`math`] | Exact 256-bit arithmetic and checked operations |
//! | [`curve`] | Invariant and swap solvers, fee formulas |
//! | [`pools`] | Liquidity and exchange operations, [`StableSwapPool`](pools::StableSwapPool) |
//! | [`domain`] | [`FeeRate`](domain::FeeRate), outcomes, validation bounds |
//! | [`config`] | [`SolverConfig`](config::SolverConfig), [`StableSwapConfig`](config::StableSwapConfig) |
//! | [`traits`] | [`SwapPool`](traits::SwapPool), [`LiquidityPool`](traits::LiquidityPool), [`FromConfig`](traits::FromConfig) |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |
//!
//! # Logging
//!
//! Solvers and operations emit [`tracing`] events: `debug` on convergence
//! and operation summaries, `trace` per iteration, `warn` when a fallback
//! solver engages.  The crate never installs a subscriber.

pub mod config;
pub mod curve;
pub mod domain;
pub mod error;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
