//! Vault configuration for the CLI: JSON file, then `SWAP_SWEEP_*`
//! environment variables, then command-line flags.

use anyhow::{Context, Result};
use clap::Args;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use swap_sweep_vault::config::VaultConfig;

/// Config overrides shared by all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON file with a vault configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Lower tick of the initial range
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub tick_lower: Option<i32>,

    /// Upper tick of the initial range
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub tick_upper: Option<i32>,

    /// Pool fee tier (3000 = 0.3%)
    #[arg(long, global = true)]
    pub fee_tier: Option<u32>,

    /// Internal deadline cap in seconds
    #[arg(long, global = true)]
    pub max_deadline: Option<u64>,

    /// Internal swap slippage in basis points
    #[arg(long, global = true)]
    pub max_slippage_bps: Option<u32>,
}

fn env_override<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} is not a valid value: {value}")),
        Err(_) => Ok(None),
    }
}

impl ConfigArgs {
    /// Resolves the final configuration.
    pub fn resolve(&self) -> Result<VaultConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => VaultConfig::default(),
        };

        if let Some(tick) = env_override("SWAP_SWEEP_TICK_LOWER")? {
            config.tick_lower = tick;
        }
        if let Some(tick) = env_override("SWAP_SWEEP_TICK_UPPER")? {
            config.tick_upper = tick;
        }
        if let Some(fee) = env_override("SWAP_SWEEP_FEE_TIER")? {
            config.fee_tier = fee;
        }
        if let Some(seconds) = env_override("SWAP_SWEEP_MAX_DEADLINE")? {
            config.max_deadline_seconds = seconds;
        }
        if let Some(bps) = env_override("SWAP_SWEEP_MAX_SLIPPAGE_BPS")? {
            config.max_slippage_bps = bps;
        }

        if let Some(tick) = self.tick_lower {
            config.tick_lower = tick;
        }
        if let Some(tick) = self.tick_upper {
            config.tick_upper = tick;
        }
        if let Some(fee) = self.fee_tier {
            config.fee_tier = fee;
        }
        if let Some(seconds) = self.max_deadline {
            config.max_deadline_seconds = seconds;
        }
        if let Some(bps) = self.max_slippage_bps {
            config.max_slippage_bps = bps;
        }
        Ok(config)
    }
}
