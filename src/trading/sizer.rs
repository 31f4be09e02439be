//! Position sizing: bounded share quantities from account risk limits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::AccountSnapshot;

use super::TradingConfig;

/// Why a ticker was sized to zero and skipped. Non-fatal; the pipeline
/// continues with the remaining tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("latest price unavailable")]
    PriceUnavailable,
    #[error("insufficient cash for the required shares")]
    Unaffordable,
    #[error("existing position already covers the target size")]
    AlreadyCovered,
}

/// Outcome of sizing one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDecision {
    /// Buy `qty` whole shares at the sizing price
    Buy { qty: u64, price: Decimal },
    /// Refuse the trade; the ticker is skipped
    Skip(SkipReason),
}

/// Calculator for bounded order quantities.
pub struct PositionSizer {
    config: TradingConfig,
}

impl PositionSizer {
    pub fn new(config: TradingConfig) -> Self {
        Self { config }
    }

    /// Size a position for one ticker.
    ///
    /// The raw position size is `(equity * account_risk) / (trade_risk *
    /// price)`. The affordability check uses the untruncated raw size; the
    /// returned quantity is the difference of the truncated raw size and the
    /// truncated current holding (no fractional shares). A non-positive
    /// difference sizes to zero.
    pub fn decide(
        &self,
        account: &AccountSnapshot,
        current_qty: Decimal,
        price: Decimal,
    ) -> SizeDecision {
        if price <= Decimal::ZERO {
            return SizeDecision::Skip(SkipReason::PriceUnavailable);
        }

        let account_risk = account.equity * self.config.account_risk_fraction;
        let raw_size = account_risk / (self.config.trade_risk * price);

        if (raw_size - current_qty) * price > account.cash {
            return SizeDecision::Skip(SkipReason::Unaffordable);
        }

        let delta = raw_size.trunc() - current_qty.trunc();
        match delta.to_u64() {
            Some(qty) if qty > 0 => SizeDecision::Buy { qty, price },
            _ => SizeDecision::Skip(SkipReason::AlreadyCovered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(equity: Decimal, cash: Decimal) -> AccountSnapshot {
        AccountSnapshot {
            equity,
            cash,
            day_trade_count: 0,
        }
    }

    fn sizer() -> PositionSizer {
        PositionSizer::new(TradingConfig::default())
    }

    #[test]
    fn test_reference_sizing() {
        // equity=100000 -> account risk 5000; price=50, trade risk 0.1
        // raw = 5000 / (0.1 * 50) = 1000 shares
        let decision = sizer().decide(&account(dec!(100000), dec!(1000000)), dec!(0), dec!(50));
        assert_eq!(
            decision,
            SizeDecision::Buy {
                qty: 1000,
                price: dec!(50)
            }
        );
    }

    #[test]
    fn test_existing_position_reduces_delta() {
        let decision = sizer().decide(&account(dec!(100000), dec!(1000000)), dec!(400), dec!(50));
        assert_eq!(
            decision,
            SizeDecision::Buy {
                qty: 600,
                price: dec!(50)
            }
        );
    }

    #[test]
    fn test_position_already_covered() {
        let decision = sizer().decide(&account(dec!(100000), dec!(1000000)), dec!(1000), dec!(50));
        assert_eq!(decision, SizeDecision::Skip(SkipReason::AlreadyCovered));

        // Over-held positions never produce a negative quantity
        let decision = sizer().decide(&account(dec!(100000), dec!(1000000)), dec!(5000), dec!(50));
        assert_eq!(decision, SizeDecision::Skip(SkipReason::AlreadyCovered));
    }

    #[test]
    fn test_unaffordable_refuses_trade() {
        // 1000 shares at $50 needs $50000 cash
        let decision = sizer().decide(&account(dec!(100000), dec!(49999)), dec!(0), dec!(50));
        assert_eq!(decision, SizeDecision::Skip(SkipReason::Unaffordable));
    }

    #[test]
    fn test_affordability_boundary_is_inclusive() {
        // Exactly enough cash is still affordable
        let decision = sizer().decide(&account(dec!(100000), dec!(50000)), dec!(0), dec!(50));
        assert_eq!(
            decision,
            SizeDecision::Buy {
                qty: 1000,
                price: dec!(50)
            }
        );
    }

    #[test]
    fn test_fractional_shares_truncate() {
        // raw = 5000 / (0.1 * 3) = 16666.66... -> 16666 whole shares
        let decision = sizer().decide(&account(dec!(100000), dec!(1000000)), dec!(0), dec!(3));
        assert_eq!(
            decision,
            SizeDecision::Buy {
                qty: 16666,
                price: dec!(3)
            }
        );
    }

    #[test]
    fn test_nonpositive_price_skips() {
        let decision = sizer().decide(&account(dec!(100000), dec!(1000000)), dec!(0), dec!(0));
        assert_eq!(decision, SizeDecision::Skip(SkipReason::PriceUnavailable));
    }
}
