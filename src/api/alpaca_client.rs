//! Alpaca REST client for account data, market data, and order execution.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;

use crate::models::AccountSnapshot;

use super::broker::Brokerage;
use super::types::{
    AccountResponse, LatestBarResponse, OrderAck, OrderLookup, OrderRequest, PositionResponse,
};

const TRADING_API_BASE: &str = "https://api.alpaca.markets";
const DATA_API_BASE: &str = "https://data.alpaca.markets";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Alpaca trading and market-data APIs.
///
/// Credentials are read once at startup and the client is immutable
/// afterwards; share it by `Arc` across invocations.
pub struct AlpacaClient {
    http: Client,
    base_url: String,
    data_url: String,
    key_id: String,
    secret_key: String,
}

impl AlpacaClient {
    /// Create a new client with explicit credentials and default endpoints.
    pub fn new(key_id: &str, secret_key: &str) -> Result<Self> {
        Self::with_base_urls(
            key_id,
            secret_key,
            TRADING_API_BASE.to_string(),
            DATA_API_BASE.to_string(),
        )
    }

    /// Create with custom endpoints (paper trading, tests).
    pub fn with_base_urls(
        key_id: &str,
        secret_key: &str,
        base_url: String,
        data_url: String,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            data_url,
            key_id: key_id.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Create from environment variables:
    /// - ALPACA_KEY_ID
    /// - ALPACA_SECRET_KEY
    /// - ALPACA_BASE_URL (defaults to the live trading API)
    /// - ALPACA_DATA_URL (defaults to the live data API)
    pub fn from_env() -> Result<Self> {
        let key_id = std::env::var("ALPACA_KEY_ID").context("ALPACA_KEY_ID not set")?;
        let secret_key =
            std::env::var("ALPACA_SECRET_KEY").context("ALPACA_SECRET_KEY not set")?;
        let base_url =
            std::env::var("ALPACA_BASE_URL").unwrap_or_else(|_| TRADING_API_BASE.to_string());
        let data_url =
            std::env::var("ALPACA_DATA_URL").unwrap_or_else(|_| DATA_API_BASE.to_string());

        Self::with_base_urls(&key_id, &secret_key, base_url, data_url)
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("apca-api-key-id"),
            HeaderValue::from_str(&self.key_id)?,
        );
        headers.insert(
            HeaderName::from_static("apca-api-secret-key"),
            HeaderValue::from_str(&self.secret_key)?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl Brokerage for AlpacaClient {
    async fn account(&self) -> Result<AccountSnapshot> {
        let url = format!("{}/v2/account", self.base_url);
        debug!(url = %url, "Fetching account");

        let resp = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to fetch account")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Account request failed: {} - {}", status, body));
        }

        let account: AccountResponse =
            resp.json().await.context("Failed to parse account response")?;

        Ok(AccountSnapshot {
            equity: account.equity,
            cash: account.cash,
            day_trade_count: account.daytrade_count,
        })
    }

    async fn latest_price(&self, symbol: &str) -> Result<Decimal> {
        let url = format!("{}/v2/stocks/{}/bars/latest", self.data_url, symbol);
        debug!(url = %url, "Fetching latest bar");

        let resp = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to fetch latest bar")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Bar request failed: {} - {}", status, body));
        }

        let latest: LatestBarResponse =
            resp.json().await.context("Failed to parse bar response")?;

        Decimal::try_from(latest.bar.c).context("Invalid bar close price")
    }

    async fn position_qty(&self, symbol: &str) -> Result<Option<Decimal>> {
        let url = format!("{}/v2/positions/{}", self.base_url, symbol);
        debug!(url = %url, "Fetching position");

        let resp = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to fetch position")?;

        // No open position is reported as 404
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Position request failed: {} - {}", status, body));
        }

        let position: PositionResponse =
            resp.json().await.context("Failed to parse position response")?;

        Ok(Some(position.qty))
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        let url = format!("{}/v2/orders", self.base_url);
        debug!(symbol = %order.symbol, order_type = ?order.order_type, "Submitting order");

        let resp = self
            .http
            .post(&url)
            .headers(self.auth_headers()?)
            .json(order)
            .send()
            .await
            .context("Failed to submit order")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Order submission failed: {} - {}", status, body));
        }

        resp.json().await.context("Failed to parse order response")
    }

    async fn order_by_client_id(&self, client_order_id: &str) -> Result<OrderLookup> {
        let url = format!(
            "{}/v2/orders:by_client_order_id?client_order_id={}",
            self.base_url, client_order_id
        );
        debug!(client_order_id = %client_order_id, "Looking up order");

        let resp = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to look up order")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Order lookup failed: {} - {}", status, body));
        }

        resp.json().await.context("Failed to parse order lookup")
    }
}
