//! Swap adapter over the external router.

use crate::error::{VaultError, VaultResult};
use crate::external::{ExactInputParams, RouterError, SwapRouter};
use crate::position::check_deadline;
use swap_sweep_domain::Asset;
use tracing::debug;

/// Executes single-hop swaps through the router at the vault's fee tier.
#[derive(Debug, Clone)]
pub struct SwapAdapter<R> {
    router: R,
    fee_tier: u32,
}

impl<R: SwapRouter> SwapAdapter<R> {
    pub fn new(router: R, fee_tier: u32) -> Self {
        Self { router, fee_tier }
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    pub fn fee_tier(&self) -> u32 {
        self.fee_tier
    }

    /// Sells exactly `amount_in` of `asset_in` for at least `min_amount_out`
    /// of the other asset.
    pub fn swap_exact_input(
        &mut self,
        asset_in: Asset,
        amount_in: u128,
        min_amount_out: u128,
        deadline: u64,
        now: u64,
    ) -> VaultResult<u128> {
        check_deadline(now, deadline)?;
        if amount_in == 0 {
            return Ok(0);
        }

        let params = ExactInputParams {
            asset_in,
            fee: self.fee_tier,
            amount_in,
            amount_out_minimum: min_amount_out,
            deadline,
        };
        let asset_out = asset_in.other();
        let amount_out = self
            .router
            .exact_input_single(&params, now)
            .map_err(|err| match err {
                RouterError::TooLittleReceived {
                    amount_out,
                    minimum,
                } => VaultError::SlippageExceeded {
                    asset: asset_out,
                    actual: amount_out,
                    limit: minimum,
                },
                RouterError::Expired => VaultError::DeadlineExpired { now, deadline },
                RouterError::Unavailable(reason) => VaultError::Router(reason),
            })?;

        if amount_out < min_amount_out {
            return Err(VaultError::SlippageExceeded {
                asset: asset_out,
                actual: amount_out,
                limit: min_amount_out,
            });
        }

        debug!(
            asset_in = %asset_in,
            amount_in,
            amount_out,
            min_amount_out,
            "Swapped"
        );
        Ok(amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedRouter;

    #[test]
    fn test_swap_at_unit_price_charges_fee() {
        let mut adapter = SwapAdapter::new(SimulatedRouter::new(0).unwrap(), 3000);
        let out = adapter
            .swap_exact_input(Asset::Asset0, 1_000_000, 0, 100, 10)
            .unwrap();
        // 30 bps fee at price 1.
        assert_eq!(out, 997_000);
    }

    #[test]
    fn test_minimum_maps_to_slippage_on_output_asset() {
        let mut adapter = SwapAdapter::new(SimulatedRouter::new(0).unwrap(), 3000);
        let err = adapter
            .swap_exact_input(Asset::Asset0, 1_000_000, 999_000, 100, 10)
            .unwrap_err();
        assert_eq!(
            err,
            VaultError::SlippageExceeded {
                asset: Asset::Asset1,
                actual: 997_000,
                limit: 999_000
            }
        );
    }

    #[test]
    fn test_expired_deadline_rejected_before_routing() {
        let mut adapter = SwapAdapter::new(SimulatedRouter::new(0).unwrap(), 3000);
        let err = adapter
            .swap_exact_input(Asset::Asset1, 10, 0, 5, 6)
            .unwrap_err();
        assert_eq!(err, VaultError::DeadlineExpired { now: 6, deadline: 5 });
        assert_eq!(adapter.router().swap_count(), 0);
    }

    #[test]
    fn test_paused_router_surfaces_reason() {
        let mut adapter = SwapAdapter::new(SimulatedRouter::new(0).unwrap(), 3000);
        adapter.router_mut().set_paused(true);
        let err = adapter
            .swap_exact_input(Asset::Asset1, 10, 0, 100, 1)
            .unwrap_err();
        assert!(matches!(err, VaultError::Router(_)));
    }
}
