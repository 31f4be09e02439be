//! Trading configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed strategy constants for sizing, order shaping, and day-trade limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Fraction of account equity put at risk across the invocation
    pub account_risk_fraction: Decimal,

    /// Fraction of a position's value risked on one trade
    pub trade_risk: Decimal,

    /// Bracket take-profit limit as a multiple of entry price
    pub take_profit_multiplier: Decimal,

    /// Bracket stop-loss trigger as a multiple of entry price
    pub stop_price_multiplier: Decimal,

    /// Bracket stop-loss limit as a multiple of entry price
    pub stop_limit_multiplier: Decimal,

    /// Trailing-stop distance below the high-water mark, in percent
    pub trail_percent: Decimal,

    /// Day-trade count at which entries switch to bracket orders
    pub day_trade_limit: u32,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            account_risk_fraction: dec!(0.05), // risk 5% of equity overall
            trade_risk: dec!(0.1),             // risk 10% on one trade
            take_profit_multiplier: dec!(1.05),
            stop_price_multiplier: dec!(0.90),
            stop_limit_multiplier: dec!(0.85),
            trail_percent: dec!(10),
            day_trade_limit: 3,
        }
    }
}
