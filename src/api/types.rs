//! Wire types for the Alpaca trading and market-data REST APIs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    TrailingStop,
}

/// Time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good till cancelled
    Gtc,
}

/// Order class; plain orders omit the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    /// Entry with an attached take-profit and stop-loss pair
    Bracket,
}

/// Take-profit leg of a bracket order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeProfit {
    #[serde(with = "rust_decimal::serde::str")]
    pub limit_price: Decimal,
}

/// Stop-loss leg of a bracket order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLoss {
    #[serde(with = "rust_decimal::serde::str")]
    pub stop_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub limit_price: Decimal,
}

/// Order submission request body (`POST /v2/orders`).
///
/// Alpaca encodes quantities, prices, and trail percentages as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_class: Option<OrderClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<TakeProfit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<StopLoss>,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub trail_percent: Option<Decimal>,
}

/// Acknowledgement returned from order submission.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderAck {
    pub id: String,
    pub status: String,
}

/// Order looked up by client order id (`GET /v2/orders:by_client_order_id`).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLookup {
    pub id: String,
    /// Lifecycle status, e.g. "new", "accepted", "filled"
    pub status: String,
}

impl OrderLookup {
    pub fn is_filled(&self) -> bool {
        self.status == "filled"
    }
}

/// Account response (`GET /v2/account`); equity and cash arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub equity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cash: Decimal,
    pub daytrade_count: u32,
}

/// Open position response (`GET /v2/positions/{symbol}`).
#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
}

/// Latest minute bar for a symbol (`GET /v2/stocks/{symbol}/bars/latest`).
#[derive(Debug, Clone, Deserialize)]
pub struct LatestBarResponse {
    pub bar: Bar,
}

/// Single OHLCV bar; only the close is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct Bar {
    /// Close price
    pub c: f64,
}
