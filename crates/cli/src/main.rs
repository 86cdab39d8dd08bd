//! Command line driver for the single-range liquidity vault.
mod price_path;
mod settings;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use price_path::GeometricBrownianMotion;
use settings::ConfigArgs;
use swap_sweep_domain::math::full_math::{BPS_DENOMINATOR, mul_div};
use swap_sweep_domain::math::price_tick::{floor_to_spacing, tick_to_price};
use swap_sweep_domain::math::valuation::quote_token1_in_token0;
use swap_sweep_vault::prelude::*;
use swap_sweep_vault::sim::{
    ManualClock, SimulatedVault, set_market_tick, simulated_vault, tick_spacing_for_fee,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "swap-sweep")]
#[command(about = "Single-range concentrated liquidity vault simulator", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the reference deployment scenario
    Scenario {
        /// Pool tick at deployment
        #[arg(long, default_value_t = 200_000, allow_negative_numbers = true)]
        tick: i32,

        /// Print the event log as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the vault along a random price path
    Simulate {
        /// Number of steps
        #[arg(short, long, default_value_t = 365)]
        steps: usize,

        /// Hours per step
        #[arg(long, default_value_t = 24)]
        step_hours: u64,

        /// Starting tick (defaults to the middle of the range)
        #[arg(long, allow_negative_numbers = true)]
        initial_tick: Option<i32>,

        /// Annualized drift
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        drift: f64,

        /// Annualized volatility
        #[arg(long, default_value_t = 0.8)]
        volatility: f64,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Token0 deposited at start
        #[arg(long, default_value_t = 100_000_000_000)]
        amount0: u128,

        /// Token1 deposited at start
        #[arg(long, default_value_t = 50_000_000_000_000_000_000)]
        amount1: u128,

        /// Pool volume per step, in token1
        #[arg(long, default_value_t = 1_000_000_000_000_000_000_000)]
        volume: u128,

        /// Vault share of in-range pool liquidity, in bps
        #[arg(long, default_value_t = 100)]
        share_bps: u32,

        /// Silo yield per year, in bps
        #[arg(long, default_value_t = 300)]
        silo_apr_bps: u32,

        /// Router price impact on every swap, in bps
        #[arg(long, default_value_t = 0)]
        price_impact_bps: u32,

        /// Rebalance every N steps while in range
        #[arg(long, default_value_t = 7)]
        rebalance_every: usize,
    },
}

fn print_readout(vault: &SimulatedVault) -> Result<()> {
    let ticks = vault.read_ticks();
    let holdings = vault.holdings()?;
    println!(
        "Range [{}, {}]  tick {}  ({})",
        ticks.tick_lower,
        ticks.tick_upper,
        ticks.current_tick,
        vault.phase()
    );
    println!(
        "  position {:?}  idle {:?}  silo {:?}",
        holdings.position, holdings.idle, holdings.silo
    );
    println!(
        "  total value {}  total shares {}",
        vault.total_value()?,
        vault.total_shares()
    );
    Ok(())
}

fn run_scenario(config: VaultConfig, tick: i32, json: bool) -> Result<()> {
    let controller = InvestorId::from("0xdeployer");
    let alice = InvestorId::from("0xalice");
    let clock = ManualClock::new(1_700_000_000);
    let mut vault = simulated_vault(config.clone(), controller.clone(), tick, clock.clone())?;

    println!("Vault {}/{} deployed", config.asset0, config.asset1);
    print_readout(&vault)?;

    let receipt = vault.deposit(
        &alice,
        DepositRequest::new(100_000_000_000_000, 10_000_000_000).with_selector(SiloSelector::Asset0),
    )?;
    println!(
        "\nDeposit by {}: used ({}, {}), shares issued {}",
        receipt.investor, receipt.amount0_used, receipt.amount1_used, receipt.shares_issued
    );
    print_readout(&vault)?;

    clock.advance(60);
    let silo1 = vault.silo(Asset::Asset1).address().to_string();
    vault.deposit_silo(&controller, &silo1, 500_000_000)?;
    println!("\nSilo top-up by {controller}: 500000000 into {silo1}");
    print_readout(&vault)?;

    match vault.reposition() {
        Err(VaultError::StillInRange { .. }) => println!("\nReposition rejected: still in range"),
        Err(err) => return Err(err.into()),
        Ok(_) => bail!("reposition succeeded while in range"),
    }

    let width = config.range_width();
    let outside = vault.read_ticks().tick_upper + width / 2;
    set_market_tick(&mut vault, outside)?;
    clock.advance(3_600);
    let report = vault.reposition()?;
    println!(
        "\nPrice moved to tick {outside}: repositioned {:?} -> {:?}, liquidity {} -> {}",
        report.old_range, report.new_range, report.old_liquidity, report.new_liquidity
    );
    print_readout(&vault)?;

    if json {
        println!("{}", serde_json::to_string_pretty(vault.events())?);
    }
    Ok(())
}

struct SimulationSummary {
    steps: usize,
    steps_in_range: usize,
    rebalances: usize,
    repositions: usize,
    failures: usize,
    fees0: u128,
    fees1: u128,
    initial_value: u128,
    final_value: u128,
    final_tick: i32,
}

impl SimulationSummary {
    fn print(&self) {
        let in_range_pct = if self.steps == 0 {
            0.0
        } else {
            self.steps_in_range as f64 * 100.0 / self.steps as f64
        };
        println!("\nSimulation Results");
        println!("════════════════════════════════════");
        println!("{:<18} {}", "Steps:", self.steps);
        println!("{:<18} {:.1}%", "Time in range:", in_range_pct);
        println!("{:<18} {}", "Rebalances:", self.rebalances);
        println!("{:<18} {}", "Repositions:", self.repositions);
        println!("{:<18} {}", "Failed calls:", self.failures);
        println!("{:<18} {} / {}", "Fees accrued:", self.fees0, self.fees1);
        println!("{:<18} {}", "Initial value:", self.initial_value);
        println!("{:<18} {}", "Final value:", self.final_value);
        println!("{:<18} {}", "Final tick:", self.final_tick);
        println!("════════════════════════════════════");
    }
}

#[allow(clippy::too_many_arguments)]
fn run_simulation(
    config: VaultConfig,
    steps: usize,
    step_hours: u64,
    initial_tick: Option<i32>,
    drift: f64,
    volatility: f64,
    seed: u64,
    deposit: (u128, u128),
    volume: u128,
    share_bps: u32,
    silo_apr_bps: u32,
    price_impact_bps: u32,
    rebalance_every: usize,
) -> Result<()> {
    let spacing = tick_spacing_for_fee(config.fee_tier);
    let start_tick = match initial_tick {
        Some(tick) => tick,
        None => floor_to_spacing(config.tick_lower + config.range_width() / 2, spacing)
            .map_err(anyhow::Error::msg)?,
    };
    let step_seconds = step_hours * 3_600;
    let path = GeometricBrownianMotion::new(
        start_tick,
        drift,
        volatility,
        step_hours as f64 / 8_760.0,
        seed,
    )
    .generate(steps)?;

    let clock = ManualClock::new(1_700_000_000);
    let mut vault = simulated_vault(
        config.clone(),
        InvestorId::from("0xcontroller"),
        start_tick,
        clock.clone(),
    )?;
    vault.router_mut().set_price_impact_bps(price_impact_bps);
    let investor = InvestorId::from("0xlp");
    vault
        .deposit(
            &investor,
            DepositRequest::new(deposit.0, deposit.1).with_selector(SiloSelector::Both),
        )
        .context("initial deposit")?;

    let initial_price = tick_to_price(start_tick).map_err(anyhow::Error::msg)?;
    info!(start_tick, %initial_price, steps, "Starting simulation");

    let mut summary = SimulationSummary {
        steps,
        steps_in_range: 0,
        rebalances: 0,
        repositions: 0,
        failures: 0,
        fees0: 0,
        fees1: 0,
        initial_value: vault.total_value()?,
        final_value: 0,
        final_tick: start_tick,
    };
    let fee_per_step = mul_div(volume, u128::from(config.fee_tier), 1_000_000)
        .and_then(|fees| mul_div(fees, u128::from(share_bps), u128::from(BPS_DENOMINATOR)))
        .map_err(anyhow::Error::msg)?;

    for (step, tick) in path.into_iter().enumerate().skip(1) {
        clock.advance(step_seconds);
        set_market_tick(&mut vault, tick)?;
        summary.final_tick = tick;

        for asset in Asset::ALL {
            let balance = vault.silo(asset).balance();
            let yearly = mul_div(balance, u128::from(silo_apr_bps), u128::from(BPS_DENOMINATOR))
                .map_err(anyhow::Error::msg)?;
            vault
                .silo_mut(asset)
                .accrue(yearly * u128::from(step_hours) / 8_760);
        }

        if vault.phase() == Phase::InRange {
            summary.steps_in_range += 1;
            let sqrt_price = vault.position().sqrt_price();
            let fee1 = fee_per_step / 2;
            let fee0 = quote_token1_in_token0(fee_per_step - fee1, sqrt_price)
                .map_err(anyhow::Error::msg)?;
            let ticks = vault.read_ticks();
            vault
                .pool_mut()
                .accrue_fees(ticks.tick_lower, ticks.tick_upper, fee0, fee1);
            summary.fees0 += fee0;
            summary.fees1 += fee1;
        }

        match vault.resolve() {
            Some(MaintenanceAction::Rebalance)
                if rebalance_every > 0 && step % rebalance_every == 0 =>
            {
                match vault.rebalance(clock.now() + 60) {
                    Ok(_) => summary.rebalances += 1,
                    Err(err) => {
                        warn!(step, error = %err, "Rebalance failed");
                        summary.failures += 1;
                    }
                }
            }
            Some(MaintenanceAction::Reposition) => match vault.reposition() {
                Ok(report) => {
                    info!(step, tick, new_range = ?report.new_range, "Repositioned");
                    summary.repositions += 1;
                }
                Err(err) => {
                    warn!(step, error = %err, "Reposition failed");
                    summary.failures += 1;
                }
            },
            Some(MaintenanceAction::Rebalance) | None => {}
        }
    }

    summary.final_value = vault.total_value()?;
    summary.print();
    print_readout(&vault)?;
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.config.resolve()?;
    config
        .validate(tick_spacing_for_fee(config.fee_tier))
        .context("invalid vault configuration")?;

    match cli.command {
        Commands::Scenario { tick, json } => run_scenario(config, tick, json)?,
        Commands::Simulate {
            steps,
            step_hours,
            initial_tick,
            drift,
            volatility,
            seed,
            amount0,
            amount1,
            volume,
            share_bps,
            silo_apr_bps,
            price_impact_bps,
            rebalance_every,
        } => run_simulation(
            config,
            steps,
            step_hours,
            initial_tick,
            drift,
            volatility,
            seed,
            (amount0, amount1),
            volume,
            share_bps,
            silo_apr_bps,
            price_impact_bps,
            rebalance_every,
        )?,
    }

    Ok(())
}
