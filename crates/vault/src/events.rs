//! Vault event log.

use crate::ledger::InvestorId;
use crate::silo::SiloSelector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swap_sweep_domain::Asset;
use uuid::Uuid;

/// Type of vault event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEventType {
    /// Shares minted against a two-asset deposit.
    Deposit,
    /// Shares burned and assets paid out.
    Withdraw,
    /// Idle reserves topped up without minting shares.
    SiloDeposit,
    /// Fees reinvested within the same range.
    Rebalance,
    /// Range moved around the current tick.
    Reposition,
    /// Controller changed a configuration cap.
    ConfigChanged,
}

/// A recorded vault event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultEvent {
    /// Event ID.
    pub id: Uuid,
    /// Event type.
    pub event_type: VaultEventType,
    /// Unix timestamp from the vault clock.
    pub timestamp: u64,
    /// Event-specific data.
    pub data: EventData,
}

impl VaultEvent {
    /// Creates an event stamped at `timestamp`.
    pub fn new(timestamp: u64, data: EventData) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: data.event_type(),
            timestamp,
            data,
        }
    }

    /// Timestamp as a UTC datetime, if representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Event-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventData {
    Deposit(DepositData),
    Withdraw(WithdrawData),
    SiloDeposit(SiloDepositData),
    Rebalance(RebalanceData),
    Reposition(RepositionData),
    ConfigChanged(ConfigChange),
}

impl EventData {
    pub fn event_type(&self) -> VaultEventType {
        match self {
            EventData::Deposit(_) => VaultEventType::Deposit,
            EventData::Withdraw(_) => VaultEventType::Withdraw,
            EventData::SiloDeposit(_) => VaultEventType::SiloDeposit,
            EventData::Rebalance(_) => VaultEventType::Rebalance,
            EventData::Reposition(_) => VaultEventType::Reposition,
            EventData::ConfigChanged(_) => VaultEventType::ConfigChanged,
        }
    }
}

/// Data for a deposit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositData {
    pub investor: InvestorId,
    /// Token0 placed into the range.
    pub amount0_used: u128,
    /// Token1 placed into the range.
    pub amount1_used: u128,
    /// Token0 parked in the silo.
    pub parked0: u128,
    /// Token1 parked in the silo.
    pub parked1: u128,
    /// Value added, in token1.
    pub value_contributed: u128,
    pub shares_issued: u128,
    pub selector: SiloSelector,
}

/// Data for a withdrawal event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawData {
    pub investor: InvestorId,
    pub shares_burned: u128,
    pub amount0_out: u128,
    pub amount1_out: u128,
    pub selector: SiloSelector,
}

/// Data for a silo top-up event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiloDepositData {
    pub contributor: InvestorId,
    pub silo: String,
    pub asset: Asset,
    pub amount: u128,
}

/// Data for a rebalance event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceData {
    /// Token0 fees collected.
    pub fees0: u128,
    /// Token1 fees collected.
    pub fees1: u128,
    /// Input sold to restore the range ratio, if any.
    pub swapped: Option<(Asset, u128)>,
    pub liquidity_added: u128,
}

/// Data for a reposition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositionData {
    pub old_tick_lower: i32,
    pub old_tick_upper: i32,
    pub new_tick_lower: i32,
    pub new_tick_upper: i32,
    /// Tick the new range was centered on.
    pub current_tick: i32,
    pub old_liquidity: u128,
    pub new_liquidity: u128,
    /// Input sold to reach the new range ratio, if any.
    pub swapped: Option<(Asset, u128)>,
}

/// A configuration cap changed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigChange {
    MaxDeadline { old: u64, new: u64 },
    MaxSlippage { old: u32, new: u32 },
}
