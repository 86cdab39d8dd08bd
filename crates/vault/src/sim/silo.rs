//! In-memory yield silo.

use crate::external::{Silo, SiloError};
use swap_sweep_domain::Asset;
use swap_sweep_domain::math::full_math::{mul_div, mul_div_rounding_up};

/// Lending-market style silo: deposits mint receipts at the current exchange
/// rate and accrued yield raises the underlying behind each receipt.
#[derive(Debug, Clone)]
pub struct SimulatedSilo {
    address: String,
    asset: Asset,
    underlying: u128,
    receipts: u128,
    paused: bool,
    liquidity_cap: Option<u128>,
}

impl SimulatedSilo {
    pub fn new(address: impl Into<String>, asset: Asset) -> Self {
        Self {
            address: address.into(),
            asset,
            underlying: 0,
            receipts: 0,
            paused: false,
            liquidity_cap: None,
        }
    }

    /// Credits yield to the holder.
    pub fn accrue(&mut self, amount: u128) {
        self.underlying = self.underlying.saturating_add(amount);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Limits how much underlying can be redeemed at once (`None` = unlimited).
    pub fn set_liquidity_cap(&mut self, cap: Option<u128>) {
        self.liquidity_cap = cap;
    }

    /// Outstanding receipt tokens.
    pub fn receipts(&self) -> u128 {
        self.receipts
    }
}

fn rejected(reason: &'static str) -> SiloError {
    SiloError::Rejected(reason.to_string())
}

impl Silo for SimulatedSilo {
    fn address(&self) -> &str {
        &self.address
    }

    fn asset(&self) -> Asset {
        self.asset
    }

    fn deposit(&mut self, amount: u128) -> Result<u128, SiloError> {
        if self.paused {
            return Err(SiloError::Paused);
        }
        let minted = if self.receipts == 0 || self.underlying == 0 {
            amount
        } else {
            mul_div(amount, self.receipts, self.underlying).map_err(rejected)?
        };
        self.underlying = self
            .underlying
            .checked_add(amount)
            .ok_or_else(|| rejected("Deposit overflow"))?;
        self.receipts = self.receipts.saturating_add(minted);
        Ok(minted)
    }

    fn withdraw(&mut self, amount: u128) -> Result<u128, SiloError> {
        if self.paused {
            return Err(SiloError::Paused);
        }
        let available = self
            .liquidity_cap
            .map_or(self.underlying, |cap| cap.min(self.underlying));
        if amount > available {
            return Err(SiloError::InsufficientLiquidity {
                requested: amount,
                available,
            });
        }
        if amount == 0 {
            return Ok(0);
        }
        let burned = mul_div_rounding_up(amount, self.receipts, self.underlying)
            .map_err(rejected)?
            .min(self.receipts);
        self.receipts -= burned;
        self.underlying -= amount;
        Ok(amount)
    }

    fn balance_of(&self) -> u128 {
        self.underlying
    }
}
