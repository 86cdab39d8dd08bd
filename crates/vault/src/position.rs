//! The vault's single concentrated-liquidity position.
//!
//! Provides functionality to manage the range position in the trading pool:
//! - Place liquidity at the ratio the range demands
//! - Withdraw liquidity with slippage floors
//! - Collect accrued trading fees
//! - Value the position at the current pool price

use crate::error::{VaultError, VaultResult};
use crate::external::{PoolError, TradingPool};
use rust_decimal::Decimal;
use swap_sweep_domain::Asset;
use swap_sweep_domain::math::concentrated_liquidity::{
    Rounding, get_amounts_for_liquidity, get_liquidity_for_amounts,
};
use swap_sweep_domain::math::price_tick::{tick_to_sqrt_price, validate_range};
use tracing::{debug, info};

/// Parameters for placing liquidity.
#[derive(Debug, Clone)]
pub struct PlaceParams {
    /// Lower tick bound.
    pub tick_lower: i32,
    /// Upper tick bound.
    pub tick_upper: i32,
    /// Maximum token0 to use.
    pub amount0_desired: u128,
    /// Maximum token1 to use.
    pub amount1_desired: u128,
    /// Minimum token0 that must be used.
    pub amount0_min: u128,
    /// Minimum token1 that must be used.
    pub amount1_min: u128,
    /// Unix timestamp after which the call fails.
    pub deadline: u64,
}

/// Result of placing liquidity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceResult {
    /// Liquidity added.
    pub liquidity: u128,
    /// Token0 paid into the pool.
    pub amount0: u128,
    /// Token1 paid into the pool.
    pub amount1: u128,
}

/// Parameters for removing liquidity.
#[derive(Debug, Clone)]
pub struct RemoveParams {
    /// Liquidity to remove.
    pub liquidity: u128,
    /// Minimum token0 received.
    pub amount0_min: u128,
    /// Minimum token1 received.
    pub amount1_min: u128,
    /// Unix timestamp after which the call fails.
    pub deadline: u64,
}

/// Snapshot of the range position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePositionState {
    pub liquidity: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Accrued, uncollected token0 fees.
    pub owed_fees0: u128,
    /// Accrued, uncollected token1 fees.
    pub owed_fees1: u128,
}

pub(crate) fn check_deadline(now: u64, deadline: u64) -> VaultResult<()> {
    if now > deadline {
        return Err(VaultError::DeadlineExpired { now, deadline });
    }
    Ok(())
}

pub(crate) fn check_floor(asset: Asset, actual: u128, minimum: u128) -> VaultResult<()> {
    if actual < minimum {
        return Err(VaultError::SlippageExceeded {
            asset,
            actual,
            limit: minimum,
        });
    }
    Ok(())
}

fn pool_error(err: PoolError) -> VaultError {
    VaultError::Pool(err.to_string())
}

/// Range position over a trading pool.
#[derive(Debug, Clone)]
pub struct RangePosition<P> {
    pool: P,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
}

impl<P: TradingPool> RangePosition<P> {
    /// Creates an empty position over `[tick_lower, tick_upper]`.
    pub fn new(pool: P, tick_lower: i32, tick_upper: i32) -> VaultResult<Self> {
        validate_range(tick_lower, tick_upper, pool.tick_spacing()).map_err(|reason| {
            VaultError::InvalidTickRange {
                tick_lower,
                tick_upper,
                reason,
            }
        })?;
        Ok(Self {
            pool,
            tick_lower,
            tick_upper,
            liquidity: 0,
        })
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut P {
        &mut self.pool
    }

    pub fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    pub fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Current pool tick.
    pub fn current_tick(&self) -> i32 {
        self.pool.current_tick()
    }

    /// Current pool sqrt price.
    pub fn sqrt_price(&self) -> Decimal {
        self.pool.slot().sqrt_price
    }

    /// Whether `tick_lower <= current_tick <= tick_upper`.
    pub fn is_in_range(&self) -> bool {
        let tick = self.current_tick();
        self.tick_lower <= tick && tick <= self.tick_upper
    }

    /// Sqrt prices at the range bounds.
    pub fn sqrt_price_bounds(&self) -> VaultResult<(Decimal, Decimal)> {
        Ok((
            tick_to_sqrt_price(self.tick_lower)?,
            tick_to_sqrt_price(self.tick_upper)?,
        ))
    }

    /// Full snapshot including owed fees.
    pub fn state(&self) -> RangePositionState {
        let (owed_fees0, owed_fees1) = self.owed_fees();
        RangePositionState {
            liquidity: self.liquidity,
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
            owed_fees0,
            owed_fees1,
        }
    }

    /// Uncollected fees recorded by the pool.
    pub fn owed_fees(&self) -> (u128, u128) {
        let position = self.pool.position(self.tick_lower, self.tick_upper);
        (position.tokens_owed0, position.tokens_owed1)
    }

    /// Token amounts the liquidity is worth at the current price, rounded down.
    pub fn amounts(&self) -> VaultResult<(u128, u128)> {
        self.amounts_for(self.liquidity)
    }

    /// Token amounts `liquidity` is worth at the current price, rounded down.
    pub fn amounts_for(&self, liquidity: u128) -> VaultResult<(u128, u128)> {
        let (sqrt_lower, sqrt_upper) = self.sqrt_price_bounds()?;
        Ok(get_amounts_for_liquidity(
            self.sqrt_price(),
            sqrt_lower,
            sqrt_upper,
            liquidity,
            Rounding::Down,
        )?)
    }

    /// Largest liquidity whose rounded-up cost fits inside the desired amounts.
    fn fit_liquidity(
        &self,
        sqrt_lower: Decimal,
        sqrt_upper: Decimal,
        amount0: u128,
        amount1: u128,
    ) -> VaultResult<u128> {
        let sqrt_price = self.sqrt_price();
        let mut liquidity =
            get_liquidity_for_amounts(sqrt_price, sqrt_lower, sqrt_upper, amount0, amount1)?;

        // Decimal rounding can push the rounded-up cost one unit over the budget.
        for _ in 0..3 {
            if liquidity == 0 {
                return Ok(0);
            }
            let (cost0, cost1) = get_amounts_for_liquidity(
                sqrt_price,
                sqrt_lower,
                sqrt_upper,
                liquidity,
                Rounding::Up,
            )?;
            if cost0 <= amount0 && cost1 <= amount1 {
                return Ok(liquidity);
            }
            liquidity -= 1;
        }
        Err(VaultError::Math("Liquidity does not fit desired amounts"))
    }

    /// Moves the (empty) position to a new range.
    pub fn set_range(&mut self, tick_lower: i32, tick_upper: i32) -> VaultResult<()> {
        if self.liquidity != 0 {
            return Err(VaultError::Math("Cannot move a range that still holds liquidity"));
        }
        validate_range(tick_lower, tick_upper, self.pool.tick_spacing()).map_err(|reason| {
            VaultError::InvalidTickRange {
                tick_lower,
                tick_upper,
                reason,
            }
        })?;
        self.tick_lower = tick_lower;
        self.tick_upper = tick_upper;
        Ok(())
    }

    /// Adds as much liquidity as the desired amounts allow over the given range.
    pub fn place(&mut self, params: &PlaceParams, now: u64) -> VaultResult<PlaceResult> {
        check_deadline(now, params.deadline)?;
        if (params.tick_lower, params.tick_upper) != (self.tick_lower, self.tick_upper) {
            self.set_range(params.tick_lower, params.tick_upper)?;
        }

        let (sqrt_lower, sqrt_upper) = self.sqrt_price_bounds()?;
        let liquidity = self.fit_liquidity(
            sqrt_lower,
            sqrt_upper,
            params.amount0_desired,
            params.amount1_desired,
        )?;

        let (amount0, amount1) = if liquidity == 0 {
            (0, 0)
        } else {
            self.pool
                .mint(self.tick_lower, self.tick_upper, liquidity)
                .map_err(pool_error)?
        };

        if amount0 > params.amount0_desired {
            return Err(VaultError::SlippageExceeded {
                asset: Asset::Asset0,
                actual: amount0,
                limit: params.amount0_desired,
            });
        }
        if amount1 > params.amount1_desired {
            return Err(VaultError::SlippageExceeded {
                asset: Asset::Asset1,
                actual: amount1,
                limit: params.amount1_desired,
            });
        }
        check_floor(Asset::Asset0, amount0, params.amount0_min)?;
        check_floor(Asset::Asset1, amount1, params.amount1_min)?;

        self.liquidity = self
            .liquidity
            .checked_add(liquidity)
            .ok_or(VaultError::Math("Liquidity overflow"))?;

        debug!(
            tick_lower = self.tick_lower,
            tick_upper = self.tick_upper,
            liquidity,
            amount0,
            amount1,
            "Placed liquidity"
        );
        Ok(PlaceResult {
            liquidity,
            amount0,
            amount1,
        })
    }

    /// Removes liquidity and collects the released principal.
    ///
    /// Accrued fees stay owed in the pool; only the burned amounts are collected.
    pub fn withdraw(&mut self, params: &RemoveParams, now: u64) -> VaultResult<(u128, u128)> {
        check_deadline(now, params.deadline)?;
        if params.liquidity > self.liquidity {
            return Err(pool_error(PoolError::InsufficientLiquidity {
                requested: params.liquidity,
                available: self.liquidity,
            }));
        }

        let (amount0, amount1) = if params.liquidity == 0 {
            (0, 0)
        } else {
            let (burned0, burned1) = self
                .pool
                .burn(self.tick_lower, self.tick_upper, params.liquidity)
                .map_err(pool_error)?;
            self.pool
                .collect(self.tick_lower, self.tick_upper, burned0, burned1)
                .map_err(pool_error)?
        };

        check_floor(Asset::Asset0, amount0, params.amount0_min)?;
        check_floor(Asset::Asset1, amount1, params.amount1_min)?;
        self.liquidity -= params.liquidity;

        debug!(
            liquidity = params.liquidity,
            amount0,
            amount1,
            remaining = self.liquidity,
            "Withdrew liquidity"
        );
        Ok((amount0, amount1))
    }

    /// Sweeps all accrued fees out of the pool.
    pub fn collect_fees(&mut self) -> VaultResult<(u128, u128)> {
        if self.liquidity > 0 {
            // Zero burn refreshes the owed amounts.
            self.pool
                .burn(self.tick_lower, self.tick_upper, 0)
                .map_err(pool_error)?;
        }
        let (owed0, owed1) = self.owed_fees();
        if owed0 == 0 && owed1 == 0 {
            return Ok((0, 0));
        }
        let fees = self
            .pool
            .collect(self.tick_lower, self.tick_upper, owed0, owed1)
            .map_err(pool_error)?;
        info!(fee0 = fees.0, fee1 = fees.1, "Collected fees");
        Ok(fees)
    }
}
