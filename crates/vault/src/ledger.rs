//! Share ledger.
//!
//! Tracks total shares and per-investor balances. All mutation goes through
//! [`ShareLedger::mint`] and [`ShareLedger::burn`], which keep
//! `sum(balances) == total_shares` at all times.

use crate::error::{VaultError, VaultResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use swap_sweep_domain::math::full_math::mul_div;
use tracing::debug;

/// Identity of an investor (an account address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InvestorId(pub String);

impl InvestorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for InvestorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for InvestorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Share balances of all investors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    total_shares: u128,
    balances: BTreeMap<InvestorId, u128>,
}

impl ShareLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total shares outstanding.
    #[must_use]
    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    /// Share balance of an investor (zero if unknown).
    #[must_use]
    pub fn balance_of(&self, investor: &InvestorId) -> u128 {
        self.balances.get(investor).copied().unwrap_or(0)
    }

    /// Investors with a non-zero balance.
    pub fn holders(&self) -> impl Iterator<Item = (&InvestorId, u128)> {
        self.balances.iter().map(|(id, shares)| (id, *shares))
    }

    /// Whether balances sum to the total supply.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let sum = self
            .balances
            .values()
            .try_fold(0u128, |acc, shares| acc.checked_add(*shares));
        sum == Some(self.total_shares)
    }

    /// Issues shares for `value_contributed` against the vault value measured
    /// before the contribution.
    ///
    /// The first deposit mints 1:1. Later deposits mint
    /// `value_contributed * total_shares / total_value_before`, rounded down so
    /// existing holders are never diluted by rounding.
    pub fn mint(
        &mut self,
        investor: &InvestorId,
        value_contributed: u128,
        total_value_before: u128,
    ) -> VaultResult<u128> {
        if value_contributed == 0 {
            return Err(VaultError::ZeroContribution);
        }

        let shares = if self.total_shares == 0 {
            value_contributed
        } else {
            if total_value_before == 0 {
                return Err(VaultError::Math("Vault value is zero with shares outstanding"));
            }
            mul_div(value_contributed, self.total_shares, total_value_before)?
        };
        if shares == 0 {
            return Err(VaultError::ZeroContribution);
        }

        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::Math("Share supply overflow"))?;
        let balance = self.balance_of(investor) + shares;

        self.total_shares = total_shares;
        self.balances.insert(investor.clone(), balance);

        debug!(
            investor = %investor,
            value = value_contributed,
            shares,
            total_shares,
            "Minted shares"
        );
        Ok(shares)
    }

    /// Burns `shares` from `investor` and returns their claim on `total_value`,
    /// computed against the supply before the burn and rounded down.
    pub fn burn(
        &mut self,
        investor: &InvestorId,
        shares: u128,
        total_value: u128,
    ) -> VaultResult<u128> {
        let available = self.balance_of(investor);
        if shares > available {
            return Err(VaultError::InsufficientShares {
                requested: shares,
                available,
            });
        }
        if shares == 0 {
            return Err(VaultError::ZeroShares);
        }

        let claim = mul_div(total_value, shares, self.total_shares)?;
        let total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::Math("Share supply underflow"))?;

        let remaining = available - shares;
        if remaining == 0 {
            self.balances.remove(investor);
        } else {
            self.balances.insert(investor.clone(), remaining);
        }
        self.total_shares = total_shares;

        debug!(
            investor = %investor,
            shares,
            claim,
            total_shares,
            "Burned shares"
        );
        Ok(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_mints_one_to_one() {
        let mut ledger = ShareLedger::new();
        let alice = InvestorId::from("alice");

        let shares = ledger.mint(&alice, 1_000, 0).unwrap();
        assert_eq!(shares, 1_000);
        assert_eq!(ledger.total_shares(), 1_000);
        assert_eq!(ledger.balance_of(&alice), 1_000);
    }

    #[test]
    fn test_proportional_mint_rounds_down() {
        let mut ledger = ShareLedger::new();
        let alice = InvestorId::from("alice");
        let bob = InvestorId::from("bob");

        ledger.mint(&alice, 1_000, 0).unwrap();
        // Vault grew to 3000 before bob contributes 1000: 1000 * 1000 / 3000 = 333.33
        let shares = ledger.mint(&bob, 1_000, 3_000).unwrap();
        assert_eq!(shares, 333);
        assert_eq!(ledger.total_shares(), 1_333);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_zero_contribution_rejected() {
        let mut ledger = ShareLedger::new();
        let alice = InvestorId::from("alice");
        assert_eq!(ledger.mint(&alice, 0, 0), Err(VaultError::ZeroContribution));

        ledger.mint(&alice, 10, 0).unwrap();
        // Too small to buy a single share.
        assert_eq!(
            ledger.mint(&alice, 1, 1_000),
            Err(VaultError::ZeroContribution)
        );
        assert_eq!(ledger.total_shares(), 10);
    }

    #[test]
    fn test_burn_returns_claim_and_removes_empty_holder() {
        let mut ledger = ShareLedger::new();
        let alice = InvestorId::from("alice");
        let bob = InvestorId::from("bob");
        ledger.mint(&alice, 600, 0).unwrap();
        ledger.mint(&bob, 400, 600).unwrap();

        let claim = ledger.burn(&bob, 400, 2_000).unwrap();
        assert_eq!(claim, 800);
        assert_eq!(ledger.balance_of(&bob), 0);
        assert_eq!(ledger.holders().count(), 1);
        assert_eq!(ledger.total_shares(), 600);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_burn_more_than_balance_fails_without_change() {
        let mut ledger = ShareLedger::new();
        let alice = InvestorId::from("alice");
        ledger.mint(&alice, 100, 0).unwrap();

        let err = ledger.burn(&alice, 101, 100).unwrap_err();
        assert_eq!(
            err,
            VaultError::InsufficientShares {
                requested: 101,
                available: 100
            }
        );
        assert_eq!(ledger.total_shares(), 100);
        assert_eq!(
            ledger.burn(&InvestorId::from("nobody"), 1, 100),
            Err(VaultError::InsufficientShares {
                requested: 1,
                available: 0
            })
        );
    }
}
