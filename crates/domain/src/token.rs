use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the vault's asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    /// The pool's token0.
    Asset0,
    /// The pool's token1, also the unit of account for vault value.
    Asset1,
}

impl Asset {
    /// Both assets in pool order.
    pub const ALL: [Asset; 2] = [Asset::Asset0, Asset::Asset1];

    /// Returns the opposite side of the pair.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Asset::Asset0 => Asset::Asset1,
            Asset::Asset1 => Asset::Asset0,
        }
    }

    /// Index into `(amount0, amount1)` style pairs.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Asset::Asset0 => 0,
            Asset::Asset1 => 1,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Asset0 => write!(f, "asset0"),
            Asset::Asset1 => write!(f, "asset1"),
        }
    }
}

/// Token metadata for one side of the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
}

impl Token {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
            name: name.into(),
        }
    }

    /// USD Coin on Ethereum mainnet.
    #[must_use]
    pub fn usdc() -> Self {
        Self::new(
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "USDC",
            6,
            "USD Coin",
        )
    }

    /// Wrapped Ether on Ethereum mainnet.
    #[must_use]
    pub fn weth() -> Self {
        Self::new(
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            "WETH",
            18,
            "Wrapped Ether",
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
