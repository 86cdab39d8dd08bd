use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swap_sweep_domain::math::valuation::value_in_token1;
use swap_sweep_vault::events::EventData;
use swap_sweep_vault::external::{ExactInputParams, RouterError};
use swap_sweep_vault::prelude::*;
use swap_sweep_vault::sim::{
    ManualClock, SimulatedPool, SimulatedRouter, SimulatedSilo, SimulatedVault, set_market_tick,
    simulated_vault,
};

fn admin() -> InvestorId {
    InvestorId::from("0xadmin")
}

fn vault_at(tick: i32, tick_lower: i32, tick_upper: i32) -> SimulatedVault {
    let config = VaultConfig::new().with_range(tick_lower, tick_upper);
    simulated_vault(config, admin(), tick, ManualClock::new(1_700_000_000)).unwrap()
}

fn last_contribution(vault: &SimulatedVault) -> u128 {
    match vault.events().last().map(|event| &event.data) {
        Some(EventData::Deposit(data)) => data.value_contributed,
        other => panic!("expected deposit event, got {other:?}"),
    }
}

#[test]
fn test_fixture_scenario() {
    let mut vault = SimulatedVault::new(
        VaultConfig::default(),
        admin(),
        SimulatedPool::new(200_000, 60, 3000).unwrap(),
        SimulatedRouter::new(200_000).unwrap(),
        [
            SimulatedSilo::new("0xsiloA", Asset::Asset0),
            SimulatedSilo::new("0xsiloB", Asset::Asset1),
        ],
        ManualClock::new(1_700_000_000),
    )
    .unwrap();
    let alice = InvestorId::from("0xalice");
    let bob = InvestorId::from("0xbob");

    let request = DepositRequest::new(100_000_000_000_000, 10_000_000_000)
        .with_selector(SiloSelector::from_code(1).unwrap());
    let receipt = vault.deposit(&alice, request).unwrap();
    let contributed = last_contribution(&vault);
    assert!(contributed > 0);
    assert_eq!(receipt.shares_issued, contributed);
    assert_eq!(receipt.shares_issued, vault.total_value().unwrap());
    assert_eq!(vault.total_shares(), receipt.shares_issued);

    let shares_before = vault.total_shares();
    let liquidity_before = vault.position().liquidity();
    let silo_a_before = vault.silo(Asset::Asset0).balance();
    let silo_b_before = vault.silo(Asset::Asset1).balance();

    assert!(matches!(
        vault.deposit_silo(&bob, "0xsiloB", 500_000_000),
        Err(VaultError::Unauthorized { .. })
    ));
    vault.deposit_silo(&admin(), "0xsiloB", 500_000_000).unwrap();
    assert_eq!(vault.total_shares(), shares_before);
    assert_eq!(vault.shares_of(&admin()), 0);
    assert_eq!(vault.position().liquidity(), liquidity_before);
    assert_eq!(vault.silo(Asset::Asset0).balance(), silo_a_before);
    assert_eq!(
        vault.silo(Asset::Asset1).balance(),
        silo_b_before + 500_000_000
    );

    let ticks = vault.read_ticks();
    assert_eq!((ticks.tick_lower, ticks.tick_upper), (185_640, 207_240));
    assert!(matches!(
        vault.reposition(),
        Err(VaultError::StillInRange {
            current_tick: 200_000,
            ..
        })
    ));

    set_market_tick(&mut vault, 210_000).unwrap();
    assert_eq!(vault.phase(), Phase::OutOfRange);
    let report = vault.reposition().unwrap();
    let ticks = vault.read_ticks();
    assert_eq!((ticks.tick_lower, ticks.tick_upper), report.new_range);
    assert!(ticks.tick_lower <= 210_000 && 210_000 <= ticks.tick_upper);
    assert_eq!(ticks.tick_upper - ticks.tick_lower, 21_600);
    assert_eq!(vault.phase(), Phase::InRange);
    assert!(report.new_liquidity > 0);
}

#[test]
fn test_share_conservation_over_random_sequences() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut vault = vault_at(0, -600, 600);
    let investors: Vec<InvestorId> = ["a", "b", "c"].into_iter().map(InvestorId::from).collect();
    let mut deposits = 0;
    let mut withdrawals = 0;

    for step in 0..200 {
        let investor = &investors[rng.random_range(0..investors.len())];
        match rng.random_range(0..4u8) {
            0 | 1 => {
                let amount0 = u128::from(rng.random_range(0..5_000_000u64));
                let amount1 = u128::from(rng.random_range(0..5_000_000u64));
                let selector = SiloSelector::from_code(rng.random_range(0..4u8)).unwrap();
                let result = vault.deposit(
                    investor,
                    DepositRequest::new(amount0, amount1).with_selector(selector),
                );
                deposits += usize::from(result.is_ok());
            }
            2 => {
                let balance = vault.shares_of(investor);
                let shares = if balance == 0 {
                    1
                } else {
                    u128::from(rng.random_range(1..=100u64)) * balance / 100
                };
                let selector = SiloSelector::from_code(rng.random_range(0..4u8)).unwrap();
                let result =
                    vault.withdraw(investor, WithdrawRequest::new(shares).with_selector(selector));
                withdrawals += usize::from(result.is_ok());
            }
            _ => {
                set_market_tick(&mut vault, rng.random_range(-500..=500)).unwrap();
                if vault.position().liquidity() > 0 {
                    let fee0 = u128::from(rng.random_range(10_000..100_000u64));
                    vault.pool_mut().accrue_fees(-600, 600, fee0, 0);
                }
                if step % 3 == 0 {
                    vault.rebalance(1_800_000_000).unwrap();
                }
            }
        }

        let ledger = vault.ledger();
        assert!(ledger.is_consistent(), "inconsistent ledger at step {step}");
        let sum: u128 = ledger.holders().map(|(_, shares)| shares).sum();
        assert_eq!(sum, vault.total_shares());
        if vault.total_shares() == 0 {
            assert_eq!(vault.total_value().unwrap(), 0);
        }
    }
    assert!(deposits >= 20, "only {deposits} deposits succeeded");
    assert!(withdrawals >= 5, "only {withdrawals} withdrawals succeeded");
}

#[test]
fn test_silo_top_up_cannot_skim_later_deposits() {
    let mut vault = vault_at(0, -600, 600);
    let alice = InvestorId::from("alice");
    let bob = InvestorId::from("bob");

    let receipt = vault.deposit(&alice, DepositRequest::new(0, 1)).unwrap();
    assert_eq!(receipt.shares_issued, 1);
    assert!(matches!(
        vault.deposit_silo(&alice, "0xsilo1", 1_000_000),
        Err(VaultError::Unauthorized { .. })
    ));
    assert_eq!(vault.silo(Asset::Asset1).balance(), 0);

    let receipt = vault.deposit(&bob, DepositRequest::new(0, 1_999_999)).unwrap();
    assert_eq!(receipt.shares_issued, 1_999_999);

    let out = vault.withdraw(&alice, WithdrawRequest::new(1)).unwrap();
    assert_eq!((out.amount0_out, out.amount1_out), (0, 1));
    assert_eq!(vault.total_value().unwrap(), 1_999_999);
}

#[test]
fn test_deposit_does_not_dilute() {
    let mut vault = vault_at(0, -600, 600);
    let alice = InvestorId::from("alice");
    let bob = InvestorId::from("bob");

    vault
        .deposit(&alice, DepositRequest::new(3_000_000, 3_000_000))
        .unwrap();
    // Yield accrues to the existing holder only.
    vault.pool_mut().accrue_fees(-600, 600, 12_345, 6_789);
    vault.silo_mut(Asset::Asset1).accrue(1_000);

    let value_before = vault.total_value().unwrap();
    let total_before = vault.total_shares();
    let receipt = vault
        .deposit(
            &bob,
            DepositRequest::new(1_000_000, 2_000_000).with_selector(SiloSelector::Both),
        )
        .unwrap();
    let contributed = last_contribution(&vault);
    let value_after = vault.total_value().unwrap();
    let total_after = vault.total_shares();

    assert_eq!(total_after, total_before + receipt.shares_issued);
    // shares / total_after == contributed / value_after within one share.
    let exact = contributed * total_after;
    let issued = receipt.shares_issued * value_after;
    assert!(issued <= exact);
    assert!(exact - issued <= value_after);
    assert!(value_after > value_before);
}

#[test]
fn test_round_trip_exact_when_parked_in_silo() {
    // Below the range the position only takes token0, so token1 is parked whole.
    let mut vault = vault_at(0, 600, 1_200);
    let alice = InvestorId::from("alice");

    let receipt = vault
        .deposit(
            &alice,
            DepositRequest::new(0, 1_000_000).with_selector(SiloSelector::Asset1),
        )
        .unwrap();
    assert_eq!(receipt.amount1_used, 0);
    assert_eq!(receipt.shares_issued, 1_000_000);

    let out = vault
        .withdraw(
            &alice,
            WithdrawRequest::new(receipt.shares_issued).with_selector(SiloSelector::Asset1),
        )
        .unwrap();
    assert_eq!((out.amount0_out, out.amount1_out), (0, 1_000_000));
    assert_eq!(vault.total_shares(), 0);
    assert_eq!(vault.total_value().unwrap(), 0);
}

#[test]
fn test_round_trip_never_returns_more() {
    let mut vault = vault_at(0, -600, 600);
    let alice = InvestorId::from("alice");

    let receipt = vault
        .deposit(
            &alice,
            DepositRequest::new(1_000_000, 1_500_000).with_selector(SiloSelector::Both),
        )
        .unwrap();
    let out = vault
        .withdraw(&alice, WithdrawRequest::new(receipt.shares_issued))
        .unwrap();

    assert!(out.amount0_out <= 1_000_000);
    assert!(out.amount1_out <= 1_500_000);
    let sqrt_price = vault.position().sqrt_price();
    let value_in = value_in_token1(1_000_000, 1_500_000, sqrt_price).unwrap();
    let value_out = value_in_token1(out.amount0_out, out.amount1_out, sqrt_price).unwrap();
    assert!(value_out <= value_in);
    assert!(value_in - value_out <= 4);
}

#[test]
fn test_reposition_guard() {
    let mut vault = vault_at(0, -600, 600);
    vault
        .deposit(&InvestorId::from("alice"), DepositRequest::new(1_000_000, 1_000_000))
        .unwrap();

    for tick in [-600, 0, 600] {
        set_market_tick(&mut vault, tick).unwrap();
        assert!(matches!(
            vault.reposition(),
            Err(VaultError::StillInRange { .. })
        ));
    }

    set_market_tick(&mut vault, 601).unwrap();
    let report = vault.reposition().unwrap();
    assert_eq!(report.old_range, (-600, 600));
    let ticks = vault.read_ticks();
    assert_ne!((ticks.tick_lower, ticks.tick_upper), (-600, 600));
    assert!(ticks.tick_lower <= 601 && 601 <= ticks.tick_upper);
    assert_eq!(vault.config().tick_lower, ticks.tick_lower);
    assert!(report.swapped.is_some());
}

#[test]
fn test_withdraw_slippage_rolls_back_everything() {
    let mut vault = vault_at(0, -600, 600);
    let alice = InvestorId::from("alice");
    vault
        .deposit(
            &alice,
            DepositRequest::new(1_000_000, 2_000_000).with_selector(SiloSelector::Asset1),
        )
        .unwrap();
    vault.pool_mut().accrue_fees(-600, 600, 100, 100);

    let holdings = vault.holdings().unwrap();
    let shares = vault.shares_of(&alice);
    let events = vault.events().len();
    let liquidity = vault.position().liquidity();

    let err = vault
        .withdraw(
            &alice,
            WithdrawRequest::new(shares).with_minimums(u128::MAX, 0),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        VaultError::SlippageExceeded {
            asset: Asset::Asset0,
            ..
        }
    ));

    assert_eq!(vault.holdings().unwrap(), holdings);
    assert_eq!(vault.shares_of(&alice), shares);
    assert_eq!(vault.total_shares(), shares);
    assert_eq!(vault.events().len(), events);
    assert_eq!(vault.position().liquidity(), liquidity);
    assert!(!vault.reentrancy_lock().is_locked());
}

#[test]
fn test_deposit_floor_rolls_back() {
    let mut vault = vault_at(0, -600, 600);
    let alice = InvestorId::from("alice");
    let err = vault
        .deposit(
            &alice,
            DepositRequest::new(1_000_000, 1_000_000).with_minimums(0, 1_000_001),
        )
        .unwrap_err();
    assert!(matches!(err, VaultError::SlippageExceeded { .. }));
    assert_eq!(vault.total_shares(), 0);
    assert_eq!(vault.holdings().unwrap(), Holdings::default());
}

#[test]
fn test_reposition_swap_slippage_rolls_back() {
    let mut vault = vault_at(0, -600, 600);
    vault
        .deposit(&InvestorId::from("alice"), DepositRequest::new(1_000_000, 1_000_000))
        .unwrap();
    // Tighter than the router's 30 bps fee.
    vault.set_max_slippage_d(&admin(), 10).unwrap();
    set_market_tick(&mut vault, 700).unwrap();

    let liquidity = vault.position().liquidity();
    let err = vault.reposition().unwrap_err();
    assert!(matches!(
        err,
        VaultError::SlippageExceeded {
            asset: Asset::Asset0,
            ..
        }
    ));
    let ticks = vault.read_ticks();
    assert_eq!((ticks.tick_lower, ticks.tick_upper), (-600, 600));
    assert_eq!(vault.position().liquidity(), liquidity);
    assert_eq!(vault.router().swap_count(), 0);

    vault.set_max_slippage_d(&admin(), 50).unwrap();
    assert!(vault.reposition().is_ok());
}

#[test]
fn test_silo_failures_surface_and_roll_back() {
    let mut vault = vault_at(0, -600, 600);
    let alice = InvestorId::from("alice");
    vault.silo_mut(Asset::Asset1).set_paused(true);

    let err = vault
        .deposit(
            &alice,
            DepositRequest::new(1_000_000, 5_000_000).with_selector(SiloSelector::Asset1),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        VaultError::SiloUnavailable {
            asset: Asset::Asset1,
            ..
        }
    ));
    assert_eq!(vault.position().liquidity(), 0);

    vault.silo_mut(Asset::Asset1).set_paused(false);
    let receipt = vault
        .deposit(
            &alice,
            DepositRequest::new(1_000_000, 5_000_000).with_selector(SiloSelector::Asset1),
        )
        .unwrap();
    vault.silo_mut(Asset::Asset1).set_liquidity_cap(Some(10));
    let err = vault
        .withdraw(
            &alice,
            WithdrawRequest::new(receipt.shares_issued).with_selector(SiloSelector::Asset1),
        )
        .unwrap_err();
    assert!(matches!(err, VaultError::InsufficientSiloLiquidity { .. }));
    assert_eq!(vault.shares_of(&alice), receipt.shares_issued);
}

/// Router that tries to re-enter the vault while a swap is in flight.
#[derive(Debug, Clone)]
struct ReentrantRouter {
    inner: SimulatedRouter,
    vault_lock: Option<ReentrancyLock>,
}

impl SwapRouter for ReentrantRouter {
    fn exact_input_single(
        &mut self,
        params: &ExactInputParams,
        now: u64,
    ) -> Result<u128, RouterError> {
        if let Some(lock) = &self.vault_lock {
            let _guard = lock
                .enter()
                .map_err(|err| RouterError::Unavailable(err.to_string()))?;
        }
        self.inner.exact_input_single(params, now)
    }
}

#[test]
fn test_reentrant_call_is_rejected() {
    let mut vault = Vault::new(
        VaultConfig::new().with_range(-600, 600),
        admin(),
        SimulatedPool::new(0, 60, 3000).unwrap(),
        ReentrantRouter {
            inner: SimulatedRouter::new(0).unwrap(),
            vault_lock: None,
        },
        [
            SimulatedSilo::new("0xsilo0", Asset::Asset0),
            SimulatedSilo::new("0xsilo1", Asset::Asset1),
        ],
        ManualClock::new(0),
    )
    .unwrap();
    vault
        .deposit(&InvestorId::from("alice"), DepositRequest::new(1_000_000, 1_000_000))
        .unwrap();

    let lock = vault.reentrancy_lock();
    vault.router_mut().vault_lock = Some(lock);
    vault.pool_mut().set_tick(700).unwrap();
    vault.router_mut().inner.set_tick(700).unwrap();

    let err = vault.reposition().unwrap_err();
    match err {
        VaultError::Router(reason) => assert!(reason.contains("Reentrant"), "{reason}"),
        other => panic!("expected router error, got {other:?}"),
    }
    assert_eq!(vault.read_ticks().tick_lower, -600);
    assert!(!vault.reentrancy_lock().is_locked());

    vault.router_mut().vault_lock = None;
    assert!(vault.reposition().is_ok());
}
