//! Commonly used types.

pub use crate::config::VaultConfig;
pub use crate::error::{VaultError, VaultResult};
pub use crate::events::{EventData, VaultEvent, VaultEventType};
pub use crate::external::{Clock, Silo, SwapRouter, TradingPool};
pub use crate::guard::ReentrancyLock;
pub use crate::ledger::{InvestorId, ShareLedger};
pub use crate::position::RangePosition;
pub use crate::silo::{SiloAdapter, SiloSelector};
pub use crate::swap::SwapAdapter;
pub use crate::vault::{
    DepositReceipt, DepositRequest, Holdings, MaintenanceAction, Phase, RebalanceReport,
    RepositionReport, TickReadout, Vault, WithdrawReceipt, WithdrawRequest,
};
pub use swap_sweep_domain::{Asset, Token};
