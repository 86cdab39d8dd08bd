//! Domain types and fixed-point math for the swap-sweep vault.
//!
//! Everything in this crate is pure: no collaborator calls, no state.
//! Math helpers follow the pool conventions of the concentrated-liquidity
//! model (prices quoted as token1 per token0, ticks on a 1.0001 lattice).

/// Concentrated-liquidity, price and share math.
pub mod math;
/// Asset and token descriptors.
pub mod token;

pub use token::{Asset, Token};
