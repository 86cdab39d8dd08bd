//! Narrow interfaces of the protocols the vault consumes.
//!
//! The vault never reaches into a protocol's internals: it reads prices and
//! positions from the trading pool, swaps through the router and parks idle
//! capital in silos, all through these traits.

use rust_decimal::Decimal;
use swap_sweep_domain::Asset;
use thiserror::Error;

/// Price state of the trading pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSlot {
    /// Square root of token1-per-token0 price.
    pub sqrt_price: Decimal,
    /// Current tick.
    pub tick: i32,
}

/// The vault's position as recorded by the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolPosition {
    /// Active liquidity.
    pub liquidity: u128,
    /// Token0 owed to the owner (burned principal plus accrued fees).
    pub tokens_owed0: u128,
    /// Token1 owed to the owner.
    pub tokens_owed1: u128,
}

/// Errors returned by a trading pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("Pool is locked")]
    Locked,
    #[error("Invalid tick range [{0}, {1}]")]
    InvalidRange(i32, i32),
    #[error("Liquidity amount must be positive")]
    ZeroLiquidity,
    #[error("Insufficient position liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u128, available: u128 },
    #[error("{0}")]
    Math(&'static str),
}

/// Concentrated-liquidity pool primitives keyed by tick range.
pub trait TradingPool {
    /// Current sqrt price and tick.
    fn slot(&self) -> PoolSlot;

    /// Current tick.
    fn current_tick(&self) -> i32 {
        self.slot().tick
    }

    /// Spacing that range bounds must be multiples of.
    fn tick_spacing(&self) -> i32;

    /// Fee tier in hundredths of a bip (3000 = 0.3%).
    fn fee_tier(&self) -> u32;

    /// Position state for a range owned by the vault.
    fn position(&self, tick_lower: i32, tick_upper: i32) -> PoolPosition;

    /// Adds liquidity, returning the token amounts paid in.
    fn mint(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), PoolError>;

    /// Removes liquidity. The released amounts become owed, not transferred.
    /// Burning zero liquidity refreshes owed fees.
    fn burn(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), PoolError>;

    /// Transfers up to the requested owed amounts to the vault.
    fn collect(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError>;
}

/// Parameters for a single-hop exact-input swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputParams {
    /// Asset sold.
    pub asset_in: Asset,
    /// Pool fee tier to route through.
    pub fee: u32,
    /// Exact amount sold.
    pub amount_in: u128,
    /// Minimum amount bought.
    pub amount_out_minimum: u128,
    /// Unix timestamp after which the swap must fail.
    pub deadline: u64,
}

/// Errors returned by a router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Too little received: {amount_out} < {minimum}")]
    TooLittleReceived { amount_out: u128, minimum: u128 },
    #[error("Transaction too old")]
    Expired,
    #[error("Router unavailable: {0}")]
    Unavailable(String),
}

/// Swap router.
pub trait SwapRouter {
    /// Swaps exactly `amount_in` and returns the amount received.
    fn exact_input_single(
        &mut self,
        params: &ExactInputParams,
        now: u64,
    ) -> Result<u128, RouterError>;
}

/// Errors returned by a silo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiloError {
    #[error("Silo is paused")]
    Paused,
    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u128, available: u128 },
    #[error("Silo rejected call: {0}")]
    Rejected(String),
}

/// Yield-bearing holding for one asset, dedicated to the vault.
pub trait Silo {
    /// Address identifying the silo.
    fn address(&self) -> &str;

    /// Underlying asset.
    fn asset(&self) -> Asset;

    /// Deposits `amount` of the underlying, returning the receipt amount minted.
    fn deposit(&mut self, amount: u128) -> Result<u128, SiloError>;

    /// Redeems `amount` of the underlying, returning what was actually sent.
    fn withdraw(&mut self, amount: u128) -> Result<u128, SiloError>;

    /// Underlying currently redeemable by the vault.
    fn balance_of(&self) -> u128;
}

/// Source of the current time in unix seconds.
pub trait Clock {
    fn now(&self) -> u64;
}
