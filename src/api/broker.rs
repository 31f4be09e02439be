//! Brokerage seam: the operations the trading pipeline consumes.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::AccountSnapshot;

use super::types::{OrderAck, OrderLookup, OrderRequest};

/// Brokerage operations consumed by the pipeline.
///
/// One production implementation exists ([`super::AlpacaClient`]); tests
/// substitute a recording mock.
#[async_trait]
pub trait Brokerage: Send + Sync {
    /// Fetch a fresh account snapshot.
    async fn account(&self) -> Result<AccountSnapshot>;

    /// Latest minute-bar close for a symbol.
    async fn latest_price(&self, symbol: &str) -> Result<Decimal>;

    /// Currently held share quantity for a symbol, `None` when no position.
    async fn position_qty(&self, symbol: &str) -> Result<Option<Decimal>>;

    /// Submit an order.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck>;

    /// Look up a previously submitted order by its client order id.
    async fn order_by_client_id(&self, client_order_id: &str) -> Result<OrderLookup>;
}
