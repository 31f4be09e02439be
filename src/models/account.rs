//! Account snapshot from the brokerage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the trading account.
///
/// Read fresh from the brokerage before each sizing or submission decision
/// and never cached across calls; each read is authoritative at that instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Total account equity in USD
    pub equity: Decimal,

    /// Settled cash available for purchases
    pub cash: Decimal,

    /// Round-trip day trades in the current rolling window
    pub day_trade_count: u32,
}
