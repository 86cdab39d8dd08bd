//! Math helpers used by the vault.
//!
//! All functions return `Result<_, &'static str>` so callers can surface
//! overflow or conversion failures instead of panicking.

pub mod concentrated_liquidity;
pub mod full_math;
pub mod price_tick;
pub mod valuation;
