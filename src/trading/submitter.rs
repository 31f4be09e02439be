//! Entry order submission: plain market buys, or bracket orders once the
//! pattern-day-trade limit is reached.

use rust_decimal::Decimal;
use tracing::info;

use crate::api::types::{
    OrderClass, OrderRequest, OrderSide, OrderType, StopLoss, TakeProfit, TimeInForce,
};
use crate::api::Brokerage;

use super::TradingConfig;

/// Why an entry submission failed. Logged and reported per ticker; never
/// aborts processing of the remaining tickers.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("entry quantity must be positive")]
    ZeroQuantity,
    #[error("brokerage rejected the entry for {symbol}: {cause}")]
    Brokerage {
        symbol: String,
        cause: anyhow::Error,
    },
}

/// Builds and submits entry orders.
pub struct OrderSubmitter {
    config: TradingConfig,
}

impl OrderSubmitter {
    pub fn new(config: TradingConfig) -> Self {
        Self { config }
    }

    /// Build the entry order for a sized ticker.
    ///
    /// Once the day-trade count reaches the limit, a round trip today would
    /// violate pattern-day-trading rules, so the exit is attached up front as
    /// a bracket. Below the limit the entry is a plain market buy tagged with
    /// the correlation id; the trailing stop is attached after the fill.
    pub fn entry_order(
        &self,
        symbol: &str,
        qty: u64,
        price: Decimal,
        day_trade_count: u32,
        client_order_id: &str,
    ) -> OrderRequest {
        if day_trade_count >= self.config.day_trade_limit {
            OrderRequest {
                symbol: symbol.to_string(),
                qty: Decimal::from(qty),
                side: OrderSide::Buy,
                order_type: OrderType::Market,
                time_in_force: TimeInForce::Gtc,
                client_order_id: None,
                order_class: Some(OrderClass::Bracket),
                take_profit: Some(TakeProfit {
                    limit_price: price * self.config.take_profit_multiplier,
                }),
                stop_loss: Some(StopLoss {
                    stop_price: price * self.config.stop_price_multiplier,
                    limit_price: price * self.config.stop_limit_multiplier,
                }),
                trail_percent: None,
            }
        } else {
            OrderRequest {
                symbol: symbol.to_string(),
                qty: Decimal::from(qty),
                side: OrderSide::Buy,
                order_type: OrderType::Market,
                time_in_force: TimeInForce::Gtc,
                client_order_id: Some(client_order_id.to_string()),
                order_class: None,
                take_profit: None,
                stop_loss: None,
                trail_percent: None,
            }
        }
    }

    /// Submit the entry order for a sized ticker.
    ///
    /// Callers filter zero-quantity sizings before reaching here; a zero
    /// quantity is still refused rather than sent to the brokerage.
    pub async fn submit_entry(
        &self,
        broker: &dyn Brokerage,
        symbol: &str,
        qty: u64,
        price: Decimal,
        day_trade_count: u32,
        client_order_id: &str,
    ) -> Result<(), SubmitError> {
        if qty == 0 {
            return Err(SubmitError::ZeroQuantity);
        }

        let order = self.entry_order(symbol, qty, price, day_trade_count, client_order_id);

        let ack = broker
            .submit_order(&order)
            .await
            .map_err(|cause| SubmitError::Brokerage {
                symbol: symbol.to_string(),
                cause,
            })?;

        info!(
            symbol = %symbol,
            qty = qty,
            price = %price,
            order_id = %ack.id,
            status = %ack.status,
            bracket = order.order_class.is_some(),
            "Entry order submitted"
        );

        Ok(())
    }
}
