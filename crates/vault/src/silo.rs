//! Idle-capital silo adapter.
//!
//! One adapter per asset. The adapter tracks the principal the vault has
//! parked; the silo itself is authoritative for the redeemable balance, which
//! may exceed principal once yield accrues.

use crate::error::{VaultError, VaultResult};
use crate::external::{Silo, SiloError};
use serde::{Deserialize, Serialize};
use std::fmt;
use swap_sweep_domain::Asset;
use tracing::debug;

/// Which silos a deposit parks into or a withdrawal redeems from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiloSelector {
    /// Keep everything idle in the vault.
    #[default]
    None,
    Asset0,
    Asset1,
    Both,
}

impl SiloSelector {
    /// Parses the numeric selector code used at the call surface.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Asset0),
            2 => Some(Self::Asset1),
            3 => Some(Self::Both),
            _ => None,
        }
    }

    /// Numeric selector code.
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Asset0 => 1,
            Self::Asset1 => 2,
            Self::Both => 3,
        }
    }

    /// Whether the silo for `asset` is selected.
    pub fn includes(self, asset: Asset) -> bool {
        matches!(
            (self, asset),
            (Self::Both, _) | (Self::Asset0, Asset::Asset0) | (Self::Asset1, Asset::Asset1)
        )
    }
}

impl fmt::Display for SiloSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Asset0 => "asset0",
            Self::Asset1 => "asset1",
            Self::Both => "both",
        };
        write!(f, "{name}")
    }
}

/// Adapter over the silo for a single asset.
#[derive(Debug, Clone)]
pub struct SiloAdapter<S> {
    silo: S,
    principal: u128,
}

impl<S: Silo> SiloAdapter<S> {
    pub fn new(silo: S) -> Self {
        Self { silo, principal: 0 }
    }

    pub fn asset(&self) -> Asset {
        self.silo.asset()
    }

    pub fn address(&self) -> &str {
        self.silo.address()
    }

    /// Net amount parked by the vault.
    pub fn principal(&self) -> u128 {
        self.principal
    }

    pub fn silo(&self) -> &S {
        &self.silo
    }

    pub fn silo_mut(&mut self) -> &mut S {
        &mut self.silo
    }

    fn map_error(&self, err: SiloError) -> VaultError {
        match err {
            SiloError::InsufficientLiquidity {
                requested,
                available,
            } => VaultError::InsufficientSiloLiquidity {
                asset: self.asset(),
                requested,
                available,
            },
            SiloError::Paused | SiloError::Rejected(_) => VaultError::SiloUnavailable {
                asset: self.asset(),
                reason: err.to_string(),
            },
        }
    }

    /// Parks `amount` in the silo, returning the receipt amount.
    pub fn deposit(&mut self, amount: u128) -> VaultResult<u128> {
        if amount == 0 {
            return Ok(0);
        }
        let receipt = self.silo.deposit(amount).map_err(|e| self.map_error(e))?;
        self.principal = self.principal.saturating_add(amount);
        debug!(asset = %self.asset(), amount, receipt, principal = self.principal, "Silo deposit");
        Ok(receipt)
    }

    /// Redeems exactly `amount` from the silo.
    pub fn withdraw(&mut self, amount: u128) -> VaultResult<u128> {
        if amount == 0 {
            return Ok(0);
        }
        let actual = self.silo.withdraw(amount).map_err(|e| self.map_error(e))?;
        if actual != amount {
            return Err(VaultError::InsufficientSiloLiquidity {
                asset: self.asset(),
                requested: amount,
                available: actual,
            });
        }
        // Redemptions beyond principal are paid from accrued yield.
        self.principal = self.principal.saturating_sub(amount);
        debug!(asset = %self.asset(), amount, principal = self.principal, "Silo withdrawal");
        Ok(actual)
    }

    /// Redeemable balance reported by the silo.
    pub fn balance(&self) -> u128 {
        self.silo.balance_of()
    }
}
