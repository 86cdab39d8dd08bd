//! Errors surfaced by vault operations.
//!
//! Every variant carries the offending values so a caller can decide how to
//! retry (looser floors, fresh deadline, smaller withdrawal).

use crate::ledger::InvestorId;
use swap_sweep_domain::Asset;
use thiserror::Error;

/// Result alias used across the crate.
pub type VaultResult<T> = Result<T, VaultError>;

/// Vault error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// Both deposit amounts were zero.
    #[error("Deposit amounts are both zero")]
    ZeroDeposit,

    /// The deposit added no measurable value, or too little to mint a share.
    #[error("Contributed value is zero")]
    ZeroContribution,

    /// Withdrawal of zero shares.
    #[error("Share amount must be positive")]
    ZeroShares,

    /// Burning more shares than the investor holds.
    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: u128, available: u128 },

    /// An achieved amount fell outside the caller's bound.
    #[error("Slippage exceeded on {asset}: got {actual}, limit {limit}")]
    SlippageExceeded {
        asset: Asset,
        actual: u128,
        limit: u128,
    },

    /// The operation ran after its deadline.
    #[error("Deadline expired: now {now}, deadline {deadline}")]
    DeadlineExpired { now: u64, deadline: u64 },

    /// Reposition requested while the range is still active.
    #[error("Current tick {current_tick} still within [{tick_lower}, {tick_upper}]")]
    StillInRange {
        tick_lower: i32,
        tick_upper: i32,
        current_tick: i32,
    },

    /// Rebalance requested while the range is stale.
    #[error("Current tick {current_tick} outside [{tick_lower}, {tick_upper}], reposition first")]
    OutOfRange {
        tick_lower: i32,
        tick_upper: i32,
        current_tick: i32,
    },

    /// The silo rejected the call.
    #[error("Silo for {asset} unavailable: {reason}")]
    SiloUnavailable { asset: Asset, reason: String },

    /// The silo could not return the exact amount requested.
    #[error("Insufficient silo liquidity for {asset}: requested {requested}, available {available}")]
    InsufficientSiloLiquidity {
        asset: Asset,
        requested: u128,
        available: u128,
    },

    /// No silo is registered under the given address.
    #[error("Unknown silo {address}")]
    UnknownSilo { address: String },

    /// Silo top-up attempted before any shares exist.
    #[error("Vault has no shares outstanding")]
    EmptyVault,

    /// A guarded entry point was entered while another was active.
    #[error("Reentrant call rejected")]
    Reentrancy,

    /// Caller is not the vault controller.
    #[error("Caller {caller} is not the vault controller")]
    Unauthorized { caller: InvestorId },

    /// Tick bounds are unordered, misaligned or out of bounds.
    #[error("Invalid tick range [{tick_lower}, {tick_upper}]: {reason}")]
    InvalidTickRange {
        tick_lower: i32,
        tick_upper: i32,
        reason: &'static str,
    },

    /// Slippage cap above 100%.
    #[error("Invalid slippage {bps} bps, must be at most 10000")]
    InvalidSlippage { bps: u32 },

    /// Deadline cap of zero seconds.
    #[error("Invalid max deadline {seconds}s, must be positive")]
    InvalidDeadline { seconds: u64 },

    /// Silo wired to the wrong side of the pair.
    #[error("Silo {address} holds {actual}, expected {expected}")]
    SiloAssetMismatch {
        address: String,
        expected: Asset,
        actual: Asset,
    },

    /// The trading pool rejected a call.
    #[error("Pool error: {0}")]
    Pool(String),

    /// The router rejected a swap.
    #[error("Router error: {0}")]
    Router(String),

    /// Overflow or conversion failure in share or liquidity math.
    #[error("Math error: {0}")]
    Math(&'static str),
}

impl From<&'static str> for VaultError {
    fn from(reason: &'static str) -> Self {
        VaultError::Math(reason)
    }
}
