//! In-memory concentrated-liquidity pool.

use crate::external::{PoolError, PoolPosition, PoolSlot, TradingPool};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use swap_sweep_domain::math::concentrated_liquidity::{Rounding, get_amounts_for_liquidity};
use swap_sweep_domain::math::price_tick::{tick_to_sqrt_price, validate_range};

/// Pool with a settable price. Positions are keyed by tick range and owned by
/// a single caller.
#[derive(Debug, Clone)]
pub struct SimulatedPool {
    tick: i32,
    sqrt_price: Decimal,
    tick_spacing: i32,
    fee_tier: u32,
    positions: BTreeMap<(i32, i32), PoolPosition>,
    reserve0: u128,
    reserve1: u128,
    paused: bool,
}

impl SimulatedPool {
    /// Creates a pool priced at `tick`.
    pub fn new(tick: i32, tick_spacing: i32, fee_tier: u32) -> Result<Self, &'static str> {
        if tick_spacing <= 0 {
            return Err("Tick spacing must be positive");
        }
        Ok(Self {
            tick,
            sqrt_price: tick_to_sqrt_price(tick)?,
            tick_spacing,
            fee_tier,
            positions: BTreeMap::new(),
            reserve0: 0,
            reserve1: 0,
            paused: false,
        })
    }

    /// Moves the pool price to `tick`.
    pub fn set_tick(&mut self, tick: i32) -> Result<(), &'static str> {
        self.sqrt_price = tick_to_sqrt_price(tick)?;
        self.tick = tick;
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Token balances held by the pool on behalf of positions.
    pub fn reserves(&self) -> (u128, u128) {
        (self.reserve0, self.reserve1)
    }

    /// Credits trading fees to a range position.
    pub fn accrue_fees(&mut self, tick_lower: i32, tick_upper: i32, fee0: u128, fee1: u128) {
        let position = self.positions.entry((tick_lower, tick_upper)).or_default();
        position.tokens_owed0 = position.tokens_owed0.saturating_add(fee0);
        position.tokens_owed1 = position.tokens_owed1.saturating_add(fee1);
        self.reserve0 = self.reserve0.saturating_add(fee0);
        self.reserve1 = self.reserve1.saturating_add(fee1);
    }

    fn range_amounts(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        rounding: Rounding,
    ) -> Result<(u128, u128), PoolError> {
        validate_range(tick_lower, tick_upper, self.tick_spacing)
            .map_err(|_| PoolError::InvalidRange(tick_lower, tick_upper))?;
        let sqrt_lower = tick_to_sqrt_price(tick_lower).map_err(PoolError::Math)?;
        let sqrt_upper = tick_to_sqrt_price(tick_upper).map_err(PoolError::Math)?;
        get_amounts_for_liquidity(self.sqrt_price, sqrt_lower, sqrt_upper, liquidity, rounding)
            .map_err(PoolError::Math)
    }
}

impl TradingPool for SimulatedPool {
    fn slot(&self) -> PoolSlot {
        PoolSlot {
            sqrt_price: self.sqrt_price,
            tick: self.tick,
        }
    }

    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn fee_tier(&self) -> u32 {
        self.fee_tier
    }

    fn position(&self, tick_lower: i32, tick_upper: i32) -> PoolPosition {
        self.positions
            .get(&(tick_lower, tick_upper))
            .copied()
            .unwrap_or_default()
    }

    fn mint(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), PoolError> {
        if self.paused {
            return Err(PoolError::Locked);
        }
        if liquidity == 0 {
            return Err(PoolError::ZeroLiquidity);
        }
        let (amount0, amount1) =
            self.range_amounts(tick_lower, tick_upper, liquidity, Rounding::Up)?;

        let position = self.positions.entry((tick_lower, tick_upper)).or_default();
        position.liquidity = position
            .liquidity
            .checked_add(liquidity)
            .ok_or(PoolError::Math("Liquidity overflow"))?;
        self.reserve0 = self.reserve0.saturating_add(amount0);
        self.reserve1 = self.reserve1.saturating_add(amount1);
        Ok((amount0, amount1))
    }

    fn burn(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), PoolError> {
        if self.paused {
            return Err(PoolError::Locked);
        }
        let available = self.position(tick_lower, tick_upper).liquidity;
        if liquidity > available {
            return Err(PoolError::InsufficientLiquidity {
                requested: liquidity,
                available,
            });
        }
        if liquidity == 0 {
            // Fees are credited as they accrue, nothing to refresh.
            return Ok((0, 0));
        }
        let (amount0, amount1) =
            self.range_amounts(tick_lower, tick_upper, liquidity, Rounding::Down)?;

        let position = self.positions.entry((tick_lower, tick_upper)).or_default();
        position.liquidity -= liquidity;
        position.tokens_owed0 = position.tokens_owed0.saturating_add(amount0);
        position.tokens_owed1 = position.tokens_owed1.saturating_add(amount1);
        Ok((amount0, amount1))
    }

    fn collect(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError> {
        if self.paused {
            return Err(PoolError::Locked);
        }
        let Some(position) = self.positions.get_mut(&(tick_lower, tick_upper)) else {
            return Ok((0, 0));
        };
        let amount0 = amount0_requested.min(position.tokens_owed0);
        let amount1 = amount1_requested.min(position.tokens_owed1);
        position.tokens_owed0 -= amount0;
        position.tokens_owed1 -= amount1;
        if *position == PoolPosition::default() {
            self.positions.remove(&(tick_lower, tick_upper));
        }
        self.reserve0 = self.reserve0.saturating_sub(amount0);
        self.reserve1 = self.reserve1.saturating_sub(amount1);
        Ok((amount0, amount1))
    }
}
