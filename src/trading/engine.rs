//! Pipeline orchestrator: tweet text in, entry orders and exits out.
//!
//! One invocation is fully sequential: extraction, per-ticker sizing,
//! per-ticker entry submission, then a bounded polling loop that attaches
//! trailing stops as fills are observed. Concurrent invocations are not
//! coordinated and can race on buying power.

use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::api::{Brokerage, TickerSource};
use crate::models::{client_order_id, new_batch_token, PendingPurchases};

use super::exits::{attempts_exhausted, day_trade_limit_reached, pending_drained};
use super::extractor::extract_tickers;
use super::sizer::{SizeDecision, SkipReason};
use super::{ExitAttacher, OrderSubmitter, PollPolicy, PositionSizer, TradingConfig};

/// Drives one tweet through the full trading pipeline.
pub struct TradeEngine {
    broker: Arc<dyn Brokerage>,
    tickers: Arc<dyn TickerSource>,
    config: TradingConfig,
    poll: PollPolicy,
    sizer: PositionSizer,
    submitter: OrderSubmitter,
    attacher: ExitAttacher,
}

impl TradeEngine {
    pub fn new(
        broker: Arc<dyn Brokerage>,
        tickers: Arc<dyn TickerSource>,
        config: TradingConfig,
        poll: PollPolicy,
    ) -> Self {
        let sizer = PositionSizer::new(config.clone());
        let submitter = OrderSubmitter::new(config.clone());
        let attacher = ExitAttacher::new(config.clone());

        Self {
            broker,
            tickers,
            config,
            poll,
            sizer,
            submitter,
            attacher,
        }
    }

    /// Process one tweet end to end.
    ///
    /// Returns `Ok(true)` only if every sized ticker reached the
    /// exit-submitted state. Tickers still pending when the polling loop
    /// gives up make the whole invocation report failure, even though their
    /// entry orders were placed and are not rolled back.
    pub async fn process_tweet(&self, tweet: &str) -> Result<bool> {
        let tweet = tweet.to_lowercase();
        info!(tweet = %tweet, "Processing tweet");

        let reference = self.tickers.reference_set().await?;
        let tickers = extract_tickers(&tweet, &reference);
        info!(tickers = ?tickers, "Extracted tickers");

        // Size each ticker; zero-quantity results never reach submission
        let mut pending = PendingPurchases::new();
        for ticker in &tickers {
            match self.size_ticker(ticker).await? {
                SizeDecision::Buy { qty, price } => {
                    info!(ticker = %ticker, qty = qty, price = %price, "Planning to buy");
                    pending.insert(ticker.clone(), (qty, price));
                }
                SizeDecision::Skip(reason) => {
                    warn!(ticker = %ticker, reason = %reason, "Ticker sized to zero, skipping");
                }
            }
        }

        if pending.is_empty() {
            info!("No purchases to be made");
            return Ok(false);
        }

        // One token per invocation, shared by every ticker's client order id
        let token = new_batch_token();

        for (ticker, (qty, price)) in &pending {
            let account = self.broker.account().await?;
            let correlation_id = client_order_id(ticker, &token);

            if let Err(e) = self
                .submitter
                .submit_entry(
                    self.broker.as_ref(),
                    ticker,
                    *qty,
                    *price,
                    account.day_trade_count,
                    &correlation_id,
                )
                .await
            {
                // The ticker stays pending; the invocation will report
                // failure once the attempt budget runs out on it
                warn!(ticker = %ticker, error = %e, "Entry submission failed");
            }
        }

        self.attach_exits(&mut pending, &token).await?;

        if !pending_drained(&pending) {
            warn!(
                unresolved = pending.len(),
                "Exit attachment incomplete, reporting failure"
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// Size one ticker against a fresh account snapshot.
    ///
    /// Price lookup failures size the ticker to zero rather than failing the
    /// invocation; a missing position counts as holding zero shares.
    async fn size_ticker(&self, ticker: &str) -> Result<SizeDecision> {
        let account = self.broker.account().await?;

        let price = match self.broker.latest_price(ticker).await {
            Ok(price) => price,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Couldn't get price info");
                return Ok(SizeDecision::Skip(SkipReason::PriceUnavailable));
            }
        };

        let current_qty = match self.broker.position_qty(ticker).await {
            Ok(Some(qty)) => qty,
            Ok(None) => Decimal::ZERO,
            Err(e) => {
                debug!(ticker = %ticker, error = %e, "Position lookup failed, assuming zero");
                Decimal::ZERO
            }
        };

        Ok(self.sizer.decide(&account, current_qty, price))
    }

    /// Poll entry fills and attach trailing stops until the pending set
    /// drains, the day-trade limit forbids round trips, or the attempt
    /// budget is spent.
    ///
    /// The day-trade count is read once before the loop, not refreshed per
    /// pass. Each failed pass blocks for the configured delay, bounding the
    /// loop at `max_attempts * delay` of wall-clock time.
    async fn attach_exits(&self, pending: &mut PendingPurchases, token: &str) -> Result<()> {
        let account = self.broker.account().await?;
        let mut remaining_attempts = self.poll.max_attempts;

        while !pending_drained(pending)
            && !day_trade_limit_reached(account.day_trade_count, &self.config)
            && !attempts_exhausted(remaining_attempts)
        {
            let Some((ticker, (qty, _price))) =
                pending.iter().map(|(k, v)| (k.clone(), *v)).next()
            else {
                break;
            };

            let correlation_id = client_order_id(&ticker, token);
            match self
                .attacher
                .attach_trailing_stop(self.broker.as_ref(), &ticker, qty, &correlation_id)
                .await
            {
                Ok(true) => {
                    pending.remove(&ticker);
                }
                Ok(false) => {
                    tokio::time::sleep(self.poll.delay).await;
                    remaining_attempts -= 1;
                }
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "Order lookup failed, retrying");
                    tokio::time::sleep(self.poll.delay).await;
                    remaining_attempts -= 1;
                }
            }
        }

        Ok(())
    }
}
