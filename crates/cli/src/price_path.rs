//! Random market paths expressed in pool ticks.

use anyhow::{Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use swap_sweep_domain::math::price_tick::{MAX_TICK, MIN_TICK};

/// Geometric Brownian motion of the pool price, sampled as ticks.
///
/// Since `price = 1.0001^tick`, a log-price increment of `x` moves the tick
/// by `x / ln(1.0001)`.
pub struct GeometricBrownianMotion {
    pub initial_tick: i32,
    pub drift: f64,      // annualized drift (mu)
    pub volatility: f64, // annualized volatility (sigma)
    pub time_step: f64,  // time step in years (dt)
    rng: StdRng,
}

impl GeometricBrownianMotion {
    pub fn new(initial_tick: i32, drift: f64, volatility: f64, time_step: f64, seed: u64) -> Self {
        Self {
            initial_tick,
            drift,
            volatility,
            time_step,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `steps` ticks after the initial one.
    pub fn generate(&mut self, steps: usize) -> Result<Vec<i32>> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| anyhow!("invalid distribution: {e}"))?;
        let dt = self.time_step;
        let drift_term = (self.drift - 0.5 * self.volatility.powi(2)) * dt;
        let vol_term = self.volatility * dt.sqrt();
        let ticks_per_log_unit = 1.0 / 1.0001f64.ln();

        let mut ticks = Vec::with_capacity(steps + 1);
        ticks.push(self.initial_tick);
        let mut log_tick = f64::from(self.initial_tick);
        for _ in 0..steps {
            let z: f64 = normal.sample(&mut self.rng);
            log_tick += (drift_term + vol_term * z) * ticks_per_log_unit;
            log_tick = log_tick.clamp(f64::from(MIN_TICK), f64::from(MAX_TICK));
            ticks.push(log_tick.round() as i32);
        }
        Ok(ticks)
    }
}
