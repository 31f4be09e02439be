//! Reference ticker list from the SEC's public line-delimited symbol file.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const SEC_TICKER_URL: &str = "https://www.sec.gov/include/ticker.txt";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the valid-symbol reference set.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Fetch the full set of valid symbols, uppercased.
    async fn reference_set(&self) -> Result<HashSet<String>>;
}

/// Client for the SEC ticker file. Fetched once per invocation, not cached.
pub struct SecTickerClient {
    http: Client,
    url: String,
}

impl SecTickerClient {
    /// Create a new client against the public SEC endpoint.
    pub fn new() -> Result<Self> {
        Self::with_url(SEC_TICKER_URL.to_string())
    }

    /// Create with a custom URL (for testing).
    pub fn with_url(url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, url })
    }
}

#[async_trait]
impl TickerSource for SecTickerClient {
    async fn reference_set(&self) -> Result<HashSet<String>> {
        debug!(url = %self.url, "Fetching ticker reference list");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch ticker list")?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(anyhow!("Ticker list request failed: {}", status));
        }

        let body = resp.text().await.context("Failed to read ticker list")?;
        Ok(parse_ticker_lines(&body))
    }
}

/// Parse the line-delimited ticker file: the first tab-delimited field of
/// each line, uppercased, is a valid symbol.
pub fn parse_ticker_lines(body: &str) -> HashSet<String> {
    body.lines()
        .filter_map(|line| line.split('\t').next())
        .map(|symbol| symbol.trim().to_uppercase())
        .filter(|symbol| !symbol.is_empty())
        .collect()
}
