//! Single-range liquidity vault.
//!
//! The vault wraps one concentrated-liquidity position, mints proportional
//! shares against two-asset deposits, parks idle capital in yield silos and
//! rebalances or repositions its range on demand:
//! - Share accounting ([`ledger::ShareLedger`])
//! - Range position management ([`position::RangePosition`])
//! - Idle-capital silos ([`silo::SiloAdapter`])
//! - Router swaps ([`swap::SwapAdapter`])
//! - Orchestration ([`vault::Vault`])
//!
//! External protocols are consumed through the traits in [`external`]; the
//! [`sim`] module provides in-memory implementations.

/// Prelude module for convenient imports.
pub mod prelude;

/// Vault configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Vault event log.
pub mod events;
/// Interfaces of the trading pool, router, silos and clock.
pub mod external;
/// Reentrancy guard.
pub mod guard;
/// Share ledger.
pub mod ledger;
/// Range position over the trading pool.
pub mod position;
/// In-memory collaborators.
pub mod sim;
/// Idle-capital silo adapter.
pub mod silo;
/// Swap adapter over the router.
pub mod swap;
/// Vault orchestrator.
pub mod vault;
