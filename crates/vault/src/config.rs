//! Vault configuration.

use crate::error::{VaultError, VaultResult};
use serde::{Deserialize, Serialize};
use swap_sweep_domain::Token;
use swap_sweep_domain::math::full_math::BPS_DENOMINATOR;
use swap_sweep_domain::math::price_tick::validate_range;

/// Configuration for a single-range vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Pool token0.
    pub asset0: Token,
    /// Pool token1, the unit of account.
    pub asset1: Token,
    /// Lower tick of the active range.
    pub tick_lower: i32,
    /// Upper tick of the active range.
    pub tick_upper: i32,
    /// Pool fee tier in hundredths of a bip.
    pub fee_tier: u32,
    /// Cap on how far in the future internal deadlines are set.
    pub max_deadline_seconds: u64,
    /// Slippage tolerance for internal swaps in basis points.
    pub max_slippage_bps: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            asset0: Token::usdc(),
            asset1: Token::weth(),
            tick_lower: 185_640,
            tick_upper: 207_240,
            fee_tier: 3000,
            max_deadline_seconds: 900, // 15 minutes
            max_slippage_bps: 50,      // 0.5%
        }
    }
}

impl VaultConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pool tokens.
    #[must_use]
    pub fn with_assets(mut self, asset0: Token, asset1: Token) -> Self {
        self.asset0 = asset0;
        self.asset1 = asset1;
        self
    }

    /// Sets the range bounds.
    #[must_use]
    pub fn with_range(mut self, tick_lower: i32, tick_upper: i32) -> Self {
        self.tick_lower = tick_lower;
        self.tick_upper = tick_upper;
        self
    }

    /// Sets the fee tier.
    #[must_use]
    pub fn with_fee_tier(mut self, fee_tier: u32) -> Self {
        self.fee_tier = fee_tier;
        self
    }

    /// Sets the deadline cap.
    #[must_use]
    pub fn with_max_deadline(mut self, seconds: u64) -> Self {
        self.max_deadline_seconds = seconds;
        self
    }

    /// Sets the slippage tolerance.
    #[must_use]
    pub fn with_max_slippage_bps(mut self, bps: u32) -> Self {
        self.max_slippage_bps = bps;
        self
    }

    /// Width of the range in ticks.
    #[must_use]
    pub fn range_width(&self) -> i32 {
        self.tick_upper - self.tick_lower
    }

    /// Validates the config against the pool's tick spacing.
    pub fn validate(&self, tick_spacing: i32) -> VaultResult<()> {
        validate_range(self.tick_lower, self.tick_upper, tick_spacing).map_err(|reason| {
            VaultError::InvalidTickRange {
                tick_lower: self.tick_lower,
                tick_upper: self.tick_upper,
                reason,
            }
        })?;
        validate_slippage(self.max_slippage_bps)?;
        validate_deadline(self.max_deadline_seconds)
    }
}

pub(crate) fn validate_slippage(bps: u32) -> VaultResult<()> {
    if bps > BPS_DENOMINATOR {
        return Err(VaultError::InvalidSlippage { bps });
    }
    Ok(())
}

pub(crate) fn validate_deadline(seconds: u64) -> VaultResult<()> {
    if seconds == 0 {
        return Err(VaultError::InvalidDeadline { seconds });
    }
    Ok(())
}
