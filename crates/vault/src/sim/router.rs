//! In-memory swap router quoting at a fixed pool price.

use crate::external::{ExactInputParams, RouterError, SwapRouter};
use rust_decimal::Decimal;
use swap_sweep_domain::math::full_math::{BPS_DENOMINATOR, mul_div_rounding_up};
use swap_sweep_domain::math::price_tick::tick_to_sqrt_price;
use swap_sweep_domain::math::valuation::quote_exact_input;

/// Router that fills every swap at its current price, less a fee and a
/// configurable price impact.
#[derive(Debug, Clone)]
pub struct SimulatedRouter {
    sqrt_price: Decimal,
    fee_bps: u32,
    price_impact_bps: u32,
    paused: bool,
    swap_count: usize,
}

impl SimulatedRouter {
    /// Creates a router priced at `tick` with a 30 bps fee and no impact.
    pub fn new(tick: i32) -> Result<Self, &'static str> {
        Ok(Self {
            sqrt_price: tick_to_sqrt_price(tick)?,
            fee_bps: 30,
            price_impact_bps: 0,
            paused: false,
            swap_count: 0,
        })
    }

    #[must_use]
    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps;
        self
    }

    #[must_use]
    pub fn with_price_impact_bps(mut self, price_impact_bps: u32) -> Self {
        self.price_impact_bps = price_impact_bps;
        self
    }

    /// Moves the router price to `tick`.
    pub fn set_tick(&mut self, tick: i32) -> Result<(), &'static str> {
        self.sqrt_price = tick_to_sqrt_price(tick)?;
        Ok(())
    }

    pub fn set_price_impact_bps(&mut self, price_impact_bps: u32) {
        self.price_impact_bps = price_impact_bps;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Number of filled swaps.
    pub fn swap_count(&self) -> usize {
        self.swap_count
    }
}

impl SwapRouter for SimulatedRouter {
    fn exact_input_single(
        &mut self,
        params: &ExactInputParams,
        now: u64,
    ) -> Result<u128, RouterError> {
        if self.paused {
            return Err(RouterError::Unavailable("Router paused".to_string()));
        }
        if now > params.deadline {
            return Err(RouterError::Expired);
        }

        let haircut_bps = (self.fee_bps + self.price_impact_bps).min(BPS_DENOMINATOR);
        let haircut = mul_div_rounding_up(
            params.amount_in,
            u128::from(haircut_bps),
            u128::from(BPS_DENOMINATOR),
        )
        .map_err(|e| RouterError::Unavailable(e.to_string()))?;
        let amount_out = quote_exact_input(
            params.asset_in,
            params.amount_in.saturating_sub(haircut),
            self.sqrt_price,
        )
        .map_err(|e| RouterError::Unavailable(e.to_string()))?;

        if amount_out < params.amount_out_minimum {
            return Err(RouterError::TooLittleReceived {
                amount_out,
                minimum: params.amount_out_minimum,
            });
        }
        self.swap_count += 1;
        Ok(amount_out)
    }
}
