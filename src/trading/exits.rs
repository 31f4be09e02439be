//! Exit attachment: trailing stops added once entry orders fill.

use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::api::types::{OrderRequest, OrderSide, OrderType, TimeInForce};
use crate::api::Brokerage;
use crate::models::PendingPurchases;

use super::TradingConfig;

/// Bounds for the fill-polling loop that drives exit attachment.
///
/// The delay is injectable so tests run with zero wait. The attempt budget
/// bounds total blocking time at `max_attempts * delay`.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Failed attachment attempts allowed before giving up
    pub max_attempts: u32,
    /// Fixed wait between failed attempts
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            delay: Duration::from_secs(1),
        }
    }
}

/// The pending set has been fully drained; every entry has its exit.
pub fn pending_drained(pending: &PendingPurchases) -> bool {
    pending.is_empty()
}

/// Attaching a trailing stop would complete a same-day round trip, which the
/// pattern-day-trade limit forbids.
pub fn day_trade_limit_reached(day_trade_count: u32, config: &TradingConfig) -> bool {
    day_trade_count >= config.day_trade_limit
}

/// The attempt budget is spent; remaining tickers stay unresolved.
pub fn attempts_exhausted(remaining_attempts: u32) -> bool {
    remaining_attempts == 0
}

/// Attaches trailing-stop exits to filled entry orders.
pub struct ExitAttacher {
    config: TradingConfig,
}

impl ExitAttacher {
    pub fn new(config: TradingConfig) -> Self {
        Self { config }
    }

    /// Build the trailing-stop sell for a filled entry: full quantity, trail
    /// percentage below the high-water mark, good till cancelled.
    pub fn trailing_stop_order(&self, symbol: &str, qty: u64) -> OrderRequest {
        OrderRequest {
            symbol: symbol.to_string(),
            qty: Decimal::from(qty),
            side: OrderSide::Sell,
            order_type: OrderType::TrailingStop,
            time_in_force: TimeInForce::Gtc,
            client_order_id: None,
            order_class: None,
            take_profit: None,
            stop_loss: None,
            trail_percent: Some(self.config.trail_percent),
        }
    }

    /// Attach a trailing stop to the entry identified by `client_order_id`.
    ///
    /// Returns `Ok(true)` once the entry is filled and the stop is submitted.
    /// Returns `Ok(false)` with no side effect while the entry is unfilled;
    /// the caller retries on its own schedule.
    pub async fn attach_trailing_stop(
        &self,
        broker: &dyn Brokerage,
        symbol: &str,
        qty: u64,
        client_order_id: &str,
    ) -> Result<bool> {
        let order = broker.order_by_client_id(client_order_id).await?;

        if !order.is_filled() {
            debug!(
                symbol = %symbol,
                client_order_id = %client_order_id,
                status = %order.status,
                "Entry not filled yet"
            );
            return Ok(false);
        }

        let stop = self.trailing_stop_order(symbol, qty);
        let ack = broker.submit_order(&stop).await?;

        info!(
            symbol = %symbol,
            qty = qty,
            entry_order_id = %order.id,
            stop_order_id = %ack.id,
            trail_percent = %self.config.trail_percent,
            "Trailing stop attached"
        );

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBroker;
    use crate::api::types::{OrderClass, OrderSide, OrderType};
    use crate::models::AccountSnapshot;
    use rust_decimal_macros::dec;

    fn broker() -> MockBroker {
        MockBroker::new(AccountSnapshot {
            equity: dec!(100000),
            cash: dec!(100000),
            day_trade_count: 0,
        })
    }

    fn attacher() -> ExitAttacher {
        ExitAttacher::new(TradingConfig::default())
    }

    #[test]
    fn test_trailing_stop_shape() {
        let order = attacher().trailing_stop_order("GHSI", 250);

        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.order_type, OrderType::TrailingStop);
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
        assert_eq!(order.qty, dec!(250));
        assert_eq!(order.trail_percent, Some(dec!(10)));
        assert!(order.order_class.is_none());
    }

    #[tokio::test]
    async fn test_unfilled_entry_has_no_side_effect() {
        let mut broker = broker();
        broker.lookups_until_fill = 100;

        // Place the entry so the lookup can find it
        let submitter = super::super::OrderSubmitter::new(TradingConfig::default());
        submitter
            .submit_entry(&broker, "GHSI", 10, dec!(50), 0, "GHSI+A1B2C")
            .await
            .unwrap();

        let attached = attacher()
            .attach_trailing_stop(&broker, "GHSI", 10, "GHSI+A1B2C")
            .await
            .unwrap();

        assert!(!attached);
        // Only the entry was submitted; no trailing stop
        assert_eq!(broker.submitted_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_filled_entry_gets_exactly_one_trailing_stop() {
        let broker = broker(); // fills on the first lookup

        let submitter = super::super::OrderSubmitter::new(TradingConfig::default());
        submitter
            .submit_entry(&broker, "GHSI", 10, dec!(50), 0, "GHSI+A1B2C")
            .await
            .unwrap();

        let attached = attacher()
            .attach_trailing_stop(&broker, "GHSI", 10, "GHSI+A1B2C")
            .await
            .unwrap();

        assert!(attached);
        let orders = broker.submitted_orders();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].order_type, OrderType::TrailingStop);
        assert_eq!(orders[1].side, OrderSide::Sell);
        assert_eq!(orders[1].qty, dec!(10));
    }

    #[tokio::test]
    async fn test_unknown_order_lookup_errors() {
        let broker = broker();

        let result = attacher()
            .attach_trailing_stop(&broker, "GHSI", 10, "GHSI+XXXXX")
            .await;

        assert!(result.is_err());
        assert!(broker.submitted_orders().is_empty());
    }

    #[test]
    fn test_loop_predicates() {
        let config = TradingConfig::default();

        let mut pending = crate::models::PendingPurchases::new();
        assert!(pending_drained(&pending));
        pending.insert("GHSI".to_string(), (10, dec!(50)));
        assert!(!pending_drained(&pending));

        assert!(!day_trade_limit_reached(2, &config));
        assert!(day_trade_limit_reached(3, &config));
        assert!(day_trade_limit_reached(4, &config));

        assert!(!attempts_exhausted(1));
        assert!(attempts_exhausted(0));
    }

    #[test]
    fn test_bracket_entries_are_never_built_here() {
        // The attacher only ever emits trailing stops
        let order = attacher().trailing_stop_order("AMD", 1);
        assert_ne!(order.order_class, Some(OrderClass::Bracket));
        assert!(order.take_profit.is_none());
        assert!(order.stop_loss.is_none());
    }
}
