//! Core trait abstractions for pool operations.
//!
//! [`SwapPool`] quotes and executes exchanges, [`LiquidityPool`] manages
//! deposits and withdrawals, and [`FromConfig`] builds a pool from a
//! validated configuration.

mod from_config;
mod liquidity_pool;
mod swap_pool;

pub use from_config::FromConfig;
pub use liquidity_pool::LiquidityPool;
pub use swap_pool::SwapPool;
