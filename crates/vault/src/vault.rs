//! Vault orchestrator.
//!
//! Composes the share ledger, range position, silos and swap adapter into the
//! vault's entry points. Every mutating entry point runs as one transaction:
//! it holds the reentrancy lock for its whole duration and restores the
//! complete vault state if any step fails.

use crate::config::{VaultConfig, validate_deadline, validate_slippage};
use crate::error::{VaultError, VaultResult};
use crate::events::{
    ConfigChange, DepositData, EventData, RebalanceData, RepositionData, SiloDepositData,
    VaultEvent, WithdrawData,
};
use crate::external::{Clock, Silo, SwapRouter, TradingPool};
use crate::guard::ReentrancyLock;
use crate::ledger::{InvestorId, ShareLedger};
use crate::position::{
    PlaceParams, PlaceResult, RangePosition, RemoveParams, check_deadline, check_floor,
};
use crate::silo::{SiloAdapter, SiloSelector};
use crate::swap::SwapAdapter;
use serde::{Deserialize, Serialize};
use std::fmt;
use swap_sweep_domain::Asset;
use swap_sweep_domain::math::full_math::{mul_div, slippage_floor};
use swap_sweep_domain::math::price_tick::center_range;
use swap_sweep_domain::math::valuation::{plan_ratio_swap, quote_exact_input, value_in_token1};
use tracing::{info, warn};

/// Whether the pool price sits inside the vault's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    InRange,
    OutOfRange,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::InRange => write!(f, "in range"),
            Phase::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Maintenance call a keeper should make next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceAction {
    /// Fees are owed on the active range.
    Rebalance,
    /// The price left the range.
    Reposition,
}

impl fmt::Display for MaintenanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceAction::Rebalance => write!(f, "rebalance"),
            MaintenanceAction::Reposition => write!(f, "reposition"),
        }
    }
}

/// Range bounds and the current pool tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReadout {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub current_tick: i32,
}

/// Deposit arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositRequest {
    pub amount0: u128,
    pub amount1: u128,
    pub amount0_min: u128,
    pub amount1_min: u128,
    /// Where unplaced remainders are parked.
    pub selector: SiloSelector,
}

impl DepositRequest {
    pub fn new(amount0: u128, amount1: u128) -> Self {
        Self {
            amount0,
            amount1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_minimums(mut self, amount0_min: u128, amount1_min: u128) -> Self {
        self.amount0_min = amount0_min;
        self.amount1_min = amount1_min;
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: SiloSelector) -> Self {
        self.selector = selector;
        self
    }
}

/// Outcome of a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub investor: InvestorId,
    /// Token0 placed into the range.
    pub amount0_used: u128,
    /// Token1 placed into the range.
    pub amount1_used: u128,
    pub shares_issued: u128,
}

/// Withdrawal arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawRequest {
    pub shares: u128,
    pub amount0_min: u128,
    pub amount1_min: u128,
    /// Silos the pro-rata silo portion is redeemed from.
    pub selector: SiloSelector,
}

impl WithdrawRequest {
    pub fn new(shares: u128) -> Self {
        Self {
            shares,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_minimums(mut self, amount0_min: u128, amount1_min: u128) -> Self {
        self.amount0_min = amount0_min;
        self.amount1_min = amount1_min;
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: SiloSelector) -> Self {
        self.selector = selector;
        self
    }
}

/// Outcome of a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub amount0_out: u128,
    pub amount1_out: u128,
}

/// Outcome of a rebalance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceReport {
    pub fees0: u128,
    pub fees1: u128,
    pub swapped: Option<(Asset, u128)>,
    pub liquidity_added: u128,
}

/// Outcome of a reposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositionReport {
    pub old_range: (i32, i32),
    pub new_range: (i32, i32),
    pub old_liquidity: u128,
    pub new_liquidity: u128,
    pub swapped: Option<(Asset, u128)>,
}

/// Per-asset breakdown of vault holdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    /// Amounts the range liquidity is worth at the current price.
    pub position: [u128; 2],
    /// Uncollected trading fees.
    pub owed_fees: [u128; 2],
    /// Balances held directly by the vault.
    pub idle: [u128; 2],
    /// Redeemable silo balances.
    pub silo: [u128; 2],
}

impl Holdings {
    /// Total amount of `asset` across all buckets.
    pub fn total(&self, asset: Asset) -> VaultResult<u128> {
        let i = asset.index();
        [self.owed_fees[i], self.idle[i], self.silo[i]]
            .into_iter()
            .try_fold(self.position[i], u128::checked_add)
            .ok_or(VaultError::Math("Holdings overflow"))
    }
}

/// Everything a failed transaction must restore.
struct Snapshot<P, R, S> {
    config: VaultConfig,
    ledger: ShareLedger,
    position: RangePosition<P>,
    swapper: SwapAdapter<R>,
    silos: [SiloAdapter<S>; 2],
    idle: [u128; 2],
    events_len: usize,
}

/// Single-range liquidity vault.
pub struct Vault<P, R, S, C> {
    config: VaultConfig,
    controller: InvestorId,
    ledger: ShareLedger,
    position: RangePosition<P>,
    swapper: SwapAdapter<R>,
    silos: [SiloAdapter<S>; 2],
    idle: [u128; 2],
    events: Vec<VaultEvent>,
    clock: C,
    lock: ReentrancyLock,
}

impl<P, R, S, C> Vault<P, R, S, C>
where
    P: TradingPool + Clone,
    R: SwapRouter + Clone,
    S: Silo + Clone,
    C: Clock,
{
    /// Creates an empty vault. `silos` must hold the asset0 silo first.
    pub fn new(
        config: VaultConfig,
        controller: InvestorId,
        pool: P,
        router: R,
        silos: [S; 2],
        clock: C,
    ) -> VaultResult<Self> {
        config.validate(pool.tick_spacing())?;
        for (silo, expected) in silos.iter().zip(Asset::ALL) {
            if silo.asset() != expected {
                return Err(VaultError::SiloAssetMismatch {
                    address: silo.address().to_string(),
                    expected,
                    actual: silo.asset(),
                });
            }
        }

        let position = RangePosition::new(pool, config.tick_lower, config.tick_upper)?;
        let swapper = SwapAdapter::new(router, config.fee_tier);
        let [silo0, silo1] = silos;

        info!(
            pair = %format!("{}/{}", config.asset0, config.asset1),
            tick_lower = config.tick_lower,
            tick_upper = config.tick_upper,
            controller = %controller,
            "Vault created"
        );
        Ok(Self {
            config,
            controller,
            ledger: ShareLedger::new(),
            position,
            swapper,
            silos: [SiloAdapter::new(silo0), SiloAdapter::new(silo1)],
            idle: [0, 0],
            events: Vec::new(),
            clock,
            lock: ReentrancyLock::new(),
        })
    }

    fn snapshot(&self) -> Snapshot<P, R, S> {
        Snapshot {
            config: self.config.clone(),
            ledger: self.ledger.clone(),
            position: self.position.clone(),
            swapper: self.swapper.clone(),
            silos: self.silos.clone(),
            idle: self.idle,
            events_len: self.events.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot<P, R, S>) {
        self.config = snapshot.config;
        self.ledger = snapshot.ledger;
        self.position = snapshot.position;
        self.swapper = snapshot.swapper;
        self.silos = snapshot.silos;
        self.idle = snapshot.idle;
        self.events.truncate(snapshot.events_len);
    }

    /// Runs `operation` atomically under the reentrancy lock.
    fn transact<T>(
        &mut self,
        name: &'static str,
        operation: impl FnOnce(&mut Self) -> VaultResult<T>,
    ) -> VaultResult<T> {
        let _guard = self.lock.enter()?;
        let snapshot = self.snapshot();
        match operation(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(operation = name, error = %err, "Vault operation rolled back");
                self.restore(snapshot);
                Err(err)
            }
        }
    }

    fn record(&mut self, data: EventData) {
        let event = VaultEvent::new(self.clock.now(), data);
        self.events.push(event);
    }

    fn internal_deadline(&self, now: u64) -> u64 {
        now.saturating_add(self.config.max_deadline_seconds)
    }

    fn credit(&mut self, asset: Asset, amount: u128) -> VaultResult<()> {
        let idle = &mut self.idle[asset.index()];
        *idle = idle
            .checked_add(amount)
            .ok_or(VaultError::Math("Idle balance overflow"))?;
        Ok(())
    }

    fn debit(&mut self, asset: Asset, amount: u128) -> VaultResult<()> {
        let idle = &mut self.idle[asset.index()];
        *idle = idle
            .checked_sub(amount)
            .ok_or(VaultError::Math("Idle balance underflow"))?;
        Ok(())
    }

    fn collect_fees_to_idle(&mut self) -> VaultResult<(u128, u128)> {
        let (fee0, fee1) = self.position.collect_fees()?;
        self.credit(Asset::Asset0, fee0)?;
        self.credit(Asset::Asset1, fee1)?;
        Ok((fee0, fee1))
    }

    /// Swaps `(amount0, amount1)` towards the current range's ratio with the
    /// internal slippage floor. Returns the post-swap amounts.
    fn swap_to_ratio(
        &mut self,
        amount0: u128,
        amount1: u128,
        deadline: u64,
        now: u64,
    ) -> VaultResult<((u128, u128), Option<(Asset, u128)>)> {
        let sqrt_price = self.position.sqrt_price();
        let (sqrt_lower, sqrt_upper) = self.position.sqrt_price_bounds()?;
        let Some(plan) = plan_ratio_swap(sqrt_price, sqrt_lower, sqrt_upper, amount0, amount1)?
        else {
            return Ok(((amount0, amount1), None));
        };

        let expected = quote_exact_input(plan.asset_in, plan.amount_in, sqrt_price)?;
        let min_out = slippage_floor(expected, self.config.max_slippage_bps)?;
        let amount_out = self.swapper.swap_exact_input(
            plan.asset_in,
            plan.amount_in,
            min_out,
            deadline,
            now,
        )?;
        self.debit(plan.asset_in, plan.amount_in)?;
        self.credit(plan.asset_in.other(), amount_out)?;

        let amounts = match plan.asset_in {
            Asset::Asset0 => (amount0 - plan.amount_in, amount1.saturating_add(amount_out)),
            Asset::Asset1 => (amount0.saturating_add(amount_out), amount1 - plan.amount_in),
        };
        Ok((amounts, Some((plan.asset_in, plan.amount_in))))
    }

    /// Places idle funds into the current range.
    fn place_from_idle(
        &mut self,
        amount0: u128,
        amount1: u128,
        amount0_min: u128,
        amount1_min: u128,
        deadline: u64,
        now: u64,
    ) -> VaultResult<PlaceResult> {
        let placed = self.position.place(
            &PlaceParams {
                tick_lower: self.position.tick_lower(),
                tick_upper: self.position.tick_upper(),
                amount0_desired: amount0,
                amount1_desired: amount1,
                amount0_min,
                amount1_min,
                deadline,
            },
            now,
        )?;
        self.debit(Asset::Asset0, placed.amount0)?;
        self.debit(Asset::Asset1, placed.amount1)?;
        Ok(placed)
    }

    /// Deposits both assets and mints shares for `investor`.
    ///
    /// The deposit is placed at the range's current ratio without swapping.
    /// Remainders are parked in the silos the selector names and otherwise
    /// stay idle. Shares are minted against the value actually added.
    pub fn deposit(
        &mut self,
        investor: &InvestorId,
        request: DepositRequest,
    ) -> VaultResult<DepositReceipt> {
        self.transact("deposit", |vault| {
            if request.amount0 == 0 && request.amount1 == 0 {
                return Err(VaultError::ZeroDeposit);
            }
            let now = vault.clock.now();
            let deadline = vault.internal_deadline(now);
            let value_before = vault.total_value()?;

            vault.credit(Asset::Asset0, request.amount0)?;
            vault.credit(Asset::Asset1, request.amount1)?;
            let placed = vault.place_from_idle(
                request.amount0,
                request.amount1,
                request.amount0_min,
                request.amount1_min,
                deadline,
                now,
            )?;

            let remainders = [
                request.amount0 - placed.amount0,
                request.amount1 - placed.amount1,
            ];
            let mut parked = [0u128; 2];
            for asset in Asset::ALL {
                let remainder = remainders[asset.index()];
                if remainder > 0 && request.selector.includes(asset) {
                    vault.silos[asset.index()].deposit(remainder)?;
                    vault.debit(asset, remainder)?;
                    parked[asset.index()] = remainder;
                }
            }

            let value_after = vault.total_value()?;
            let value_contributed = value_after.saturating_sub(value_before);
            let shares_issued = vault.ledger.mint(investor, value_contributed, value_before)?;

            vault.record(EventData::Deposit(DepositData {
                investor: investor.clone(),
                amount0_used: placed.amount0,
                amount1_used: placed.amount1,
                parked0: parked[0],
                parked1: parked[1],
                value_contributed,
                shares_issued,
                selector: request.selector,
            }));
            info!(
                investor = %investor,
                amount0_used = placed.amount0,
                amount1_used = placed.amount1,
                parked0 = parked[0],
                parked1 = parked[1],
                value_contributed,
                shares_issued,
                "Deposit completed"
            );
            Ok(DepositReceipt {
                investor: investor.clone(),
                amount0_used: placed.amount0,
                amount1_used: placed.amount1,
                shares_issued,
            })
        })
    }

    /// Tops up a silo with the caller's asset. Mints no shares. Controller only.
    pub fn deposit_silo(
        &mut self,
        contributor: &InvestorId,
        silo_address: &str,
        amount: u128,
    ) -> VaultResult<()> {
        self.transact("deposit_silo", |vault| {
            vault.ensure_controller(contributor)?;
            let index = vault
                .silos
                .iter()
                .position(|silo| silo.address() == silo_address)
                .ok_or_else(|| VaultError::UnknownSilo {
                    address: silo_address.to_string(),
                })?;
            if amount == 0 {
                return Err(VaultError::ZeroDeposit);
            }
            if vault.ledger.total_shares() == 0 {
                return Err(VaultError::EmptyVault);
            }

            let asset = vault.silos[index].asset();
            vault.silos[index].deposit(amount)?;
            vault.record(EventData::SiloDeposit(SiloDepositData {
                contributor: contributor.clone(),
                silo: silo_address.to_string(),
                asset,
                amount,
            }));
            info!(
                contributor = %contributor,
                silo = silo_address,
                asset = %asset,
                amount,
                "Silo topped up"
            );
            Ok(())
        })
    }

    /// Burns shares and pays out the pro-rata slice of every bucket.
    pub fn withdraw(
        &mut self,
        investor: &InvestorId,
        request: WithdrawRequest,
    ) -> VaultResult<WithdrawReceipt> {
        self.transact("withdraw", |vault| {
            let now = vault.clock.now();
            let deadline = vault.internal_deadline(now);
            vault.collect_fees_to_idle()?;

            let total_shares = vault.ledger.total_shares();
            let total_value = vault.total_value()?;
            let claim = vault.ledger.burn(investor, request.shares, total_value)?;
            let pro_rata = |amount: u128| mul_div(amount, request.shares, total_shares);

            let liquidity = pro_rata(vault.position.liquidity())?;
            let (from_position0, from_position1) = vault.position.withdraw(
                &RemoveParams {
                    liquidity,
                    amount0_min: 0,
                    amount1_min: 0,
                    deadline,
                },
                now,
            )?;

            let mut out = [from_position0, from_position1];
            for asset in Asset::ALL {
                let i = asset.index();
                let idle_share = pro_rata(vault.idle[i])?;
                vault.debit(asset, idle_share)?;

                let silo_share = pro_rata(vault.silos[i].balance())?;
                if request.selector.includes(asset) {
                    vault.silos[i].withdraw(silo_share)?;
                } else {
                    // Fund from idle first, redeem only the shortfall.
                    let from_idle = silo_share.min(vault.idle[i]);
                    vault.debit(asset, from_idle)?;
                    vault.silos[i].withdraw(silo_share - from_idle)?;
                }
                out[i] = out[i]
                    .checked_add(idle_share)
                    .and_then(|v| v.checked_add(silo_share))
                    .ok_or(VaultError::Math("Payout overflow"))?;
            }

            check_floor(Asset::Asset0, out[0], request.amount0_min)?;
            check_floor(Asset::Asset1, out[1], request.amount1_min)?;

            vault.record(EventData::Withdraw(WithdrawData {
                investor: investor.clone(),
                shares_burned: request.shares,
                amount0_out: out[0],
                amount1_out: out[1],
                selector: request.selector,
            }));
            info!(
                investor = %investor,
                shares = request.shares,
                claim,
                amount0_out = out[0],
                amount1_out = out[1],
                "Withdrawal completed"
            );
            Ok(WithdrawReceipt {
                amount0_out: out[0],
                amount1_out: out[1],
            })
        })
    }

    /// Reinvests accrued fees within the current range.
    pub fn rebalance(&mut self, deadline: u64) -> VaultResult<RebalanceReport> {
        self.transact("rebalance", |vault| {
            let now = vault.clock.now();
            check_deadline(now, deadline)?;
            let deadline = deadline.min(vault.internal_deadline(now));

            let readout = vault.read_ticks();
            if vault.phase() == Phase::OutOfRange {
                return Err(VaultError::OutOfRange {
                    tick_lower: readout.tick_lower,
                    tick_upper: readout.tick_upper,
                    current_tick: readout.current_tick,
                });
            }

            let (fees0, fees1) = vault.collect_fees_to_idle()?;
            let ((amount0, amount1), swapped) = vault.swap_to_ratio(fees0, fees1, deadline, now)?;
            let placed = vault.place_from_idle(amount0, amount1, 0, 0, deadline, now)?;

            let report = RebalanceReport {
                fees0,
                fees1,
                swapped,
                liquidity_added: placed.liquidity,
            };
            vault.record(EventData::Rebalance(RebalanceData {
                fees0,
                fees1,
                swapped,
                liquidity_added: placed.liquidity,
            }));
            info!(
                fees0,
                fees1,
                swapped = ?swapped,
                liquidity_added = placed.liquidity,
                "Rebalance completed"
            );
            Ok(report)
        })
    }

    /// Moves the range to re-center on the current tick after the price left it.
    ///
    /// All liquidity and idle balances are swapped to the new range's ratio
    /// and re-placed. Silo balances are left untouched.
    pub fn reposition(&mut self) -> VaultResult<RepositionReport> {
        self.transact("reposition", |vault| {
            let now = vault.clock.now();
            let deadline = vault.internal_deadline(now);

            let readout = vault.read_ticks();
            if vault.phase() == Phase::InRange {
                return Err(VaultError::StillInRange {
                    tick_lower: readout.tick_lower,
                    tick_upper: readout.tick_upper,
                    current_tick: readout.current_tick,
                });
            }

            vault.collect_fees_to_idle()?;
            let old_liquidity = vault.position.liquidity();
            let (amount0, amount1) = vault.position.withdraw(
                &RemoveParams {
                    liquidity: old_liquidity,
                    amount0_min: 0,
                    amount1_min: 0,
                    deadline,
                },
                now,
            )?;
            vault.credit(Asset::Asset0, amount0)?;
            vault.credit(Asset::Asset1, amount1)?;

            let (tick_lower, tick_upper) = center_range(
                readout.current_tick,
                vault.config.range_width(),
                vault.position.pool().tick_spacing(),
            )?;
            // Clamping at the tick bounds can leave the price outside the new range.
            if !(tick_lower..=tick_upper).contains(&readout.current_tick) {
                return Err(VaultError::InvalidTickRange {
                    tick_lower,
                    tick_upper,
                    reason: "Re-centered range does not contain the current tick",
                });
            }
            vault.position.set_range(tick_lower, tick_upper)?;
            vault.config.tick_lower = tick_lower;
            vault.config.tick_upper = tick_upper;

            let [idle0, idle1] = vault.idle;
            let ((amount0, amount1), swapped) = vault.swap_to_ratio(idle0, idle1, deadline, now)?;
            let placed = vault.place_from_idle(amount0, amount1, 0, 0, deadline, now)?;

            vault.record(EventData::Reposition(RepositionData {
                old_tick_lower: readout.tick_lower,
                old_tick_upper: readout.tick_upper,
                new_tick_lower: tick_lower,
                new_tick_upper: tick_upper,
                current_tick: readout.current_tick,
                old_liquidity,
                new_liquidity: placed.liquidity,
                swapped,
            }));
            info!(
                old_tick_lower = readout.tick_lower,
                old_tick_upper = readout.tick_upper,
                new_tick_lower = tick_lower,
                new_tick_upper = tick_upper,
                current_tick = readout.current_tick,
                old_liquidity,
                new_liquidity = placed.liquidity,
                "Reposition completed"
            );
            Ok(RepositionReport {
                old_range: (readout.tick_lower, readout.tick_upper),
                new_range: (tick_lower, tick_upper),
                old_liquidity,
                new_liquidity: placed.liquidity,
                swapped,
            })
        })
    }

    fn ensure_controller(&self, caller: &InvestorId) -> VaultResult<()> {
        if *caller != self.controller {
            warn!(caller = %caller, "Unauthorized controller call");
            return Err(VaultError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Sets the internal deadline cap. Controller only.
    pub fn set_max_deadline(&mut self, caller: &InvestorId, seconds: u64) -> VaultResult<()> {
        self.transact("set_max_deadline", |vault| {
            vault.ensure_controller(caller)?;
            validate_deadline(seconds)?;
            let old = vault.config.max_deadline_seconds;
            vault.config.max_deadline_seconds = seconds;
            vault.record(EventData::ConfigChanged(ConfigChange::MaxDeadline {
                old,
                new: seconds,
            }));
            info!(old, new = seconds, "Max deadline updated");
            Ok(())
        })
    }

    /// Sets the internal slippage tolerance in basis points. Controller only.
    pub fn set_max_slippage_d(&mut self, caller: &InvestorId, bps: u32) -> VaultResult<()> {
        self.transact("set_max_slippage_d", |vault| {
            vault.ensure_controller(caller)?;
            validate_slippage(bps)?;
            let old = vault.config.max_slippage_bps;
            vault.config.max_slippage_bps = bps;
            vault.record(EventData::ConfigChanged(ConfigChange::MaxSlippage { old, new: bps }));
            info!(old, new = bps, "Max slippage updated");
            Ok(())
        })
    }

    /// Range bounds and current tick.
    pub fn read_ticks(&self) -> TickReadout {
        TickReadout {
            tick_lower: self.position.tick_lower(),
            tick_upper: self.position.tick_upper(),
            current_tick: self.position.current_tick(),
        }
    }

    /// Phase classified from a fresh tick read.
    pub fn phase(&self) -> Phase {
        if self.position.is_in_range() {
            Phase::InRange
        } else {
            Phase::OutOfRange
        }
    }

    /// Which maintenance call is due, if any.
    ///
    /// Reposition once the price has left the range; rebalance while in
    /// range and fees are waiting to be reinvested.
    pub fn resolve(&self) -> Option<MaintenanceAction> {
        match self.phase() {
            Phase::OutOfRange => Some(MaintenanceAction::Reposition),
            Phase::InRange => {
                let (owed0, owed1) = self.position.owed_fees();
                (owed0 > 0 || owed1 > 0).then_some(MaintenanceAction::Rebalance)
            }
        }
    }

    pub fn holdings(&self) -> VaultResult<Holdings> {
        let (position0, position1) = self.position.amounts()?;
        let (owed0, owed1) = self.position.owed_fees();
        Ok(Holdings {
            position: [position0, position1],
            owed_fees: [owed0, owed1],
            idle: self.idle,
            silo: [self.silos[0].balance(), self.silos[1].balance()],
        })
    }

    /// Total vault value in token1 at the current pool price.
    pub fn total_value(&self) -> VaultResult<u128> {
        let holdings = self.holdings()?;
        Ok(value_in_token1(
            holdings.total(Asset::Asset0)?,
            holdings.total(Asset::Asset1)?,
            self.position.sqrt_price(),
        )?)
    }

    pub fn shares_of(&self, investor: &InvestorId) -> u128 {
        self.ledger.balance_of(investor)
    }

    pub fn total_shares(&self) -> u128 {
        self.ledger.total_shares()
    }

    pub fn ledger(&self) -> &ShareLedger {
        &self.ledger
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn controller(&self) -> &InvestorId {
        &self.controller
    }

    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    pub fn position(&self) -> &RangePosition<P> {
        &self.position
    }

    pub fn silo(&self, asset: Asset) -> &SiloAdapter<S> {
        &self.silos[asset.index()]
    }

    pub fn silo_mut(&mut self, asset: Asset) -> &mut S {
        self.silos[asset.index()].silo_mut()
    }

    pub fn pool_mut(&mut self) -> &mut P {
        self.position.pool_mut()
    }

    pub fn router(&self) -> &R {
        self.swapper.router()
    }

    pub fn router_mut(&mut self) -> &mut R {
        self.swapper.router_mut()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Handle on the vault's reentrancy flag.
    pub fn reentrancy_lock(&self) -> ReentrancyLock {
        self.lock.clone()
    }
}
