//! In-memory collaborators for tests and offline simulation.
//!
//! - [`SimulatedPool`]: settable price, per-range positions, fee accrual
//! - [`SimulatedRouter`]: fills at the pool price less fee and impact
//! - [`SimulatedSilo`]: receipt-based yield holding with pause and caps
//! - [`ManualClock`] / [`SystemClock`]

pub mod clock;
pub mod pool;
pub mod router;
pub mod silo;

pub use clock::{ManualClock, SystemClock};
pub use pool::SimulatedPool;
pub use router::SimulatedRouter;
pub use silo::SimulatedSilo;

use crate::config::VaultConfig;
use crate::error::VaultResult;
use crate::ledger::InvestorId;
use crate::vault::Vault;
use swap_sweep_domain::Asset;

/// Vault wired to in-memory collaborators.
pub type SimulatedVault = Vault<SimulatedPool, SimulatedRouter, SimulatedSilo, ManualClock>;

/// Tick spacing used by the given fee tier.
pub fn tick_spacing_for_fee(fee_tier: u32) -> i32 {
    match fee_tier {
        100 => 1,
        500 => 10,
        3000 => 60,
        _ => 200,
    }
}

/// Builds a simulated vault priced at `tick`, with silos at `0xsilo0` and
/// `0xsilo1`.
pub fn simulated_vault(
    config: VaultConfig,
    controller: InvestorId,
    tick: i32,
    clock: ManualClock,
) -> VaultResult<SimulatedVault> {
    let pool = SimulatedPool::new(tick, tick_spacing_for_fee(config.fee_tier), config.fee_tier)?;
    let router = SimulatedRouter::new(tick)?;
    let silos = [
        SimulatedSilo::new("0xsilo0", Asset::Asset0),
        SimulatedSilo::new("0xsilo1", Asset::Asset1),
    ];
    Vault::new(config, controller, pool, router, silos, clock)
}

/// Moves the market price: pool and router together.
pub fn set_market_tick(vault: &mut SimulatedVault, tick: i32) -> VaultResult<()> {
    vault.pool_mut().set_tick(tick)?;
    vault.router_mut().set_tick(tick)?;
    Ok(())
}
