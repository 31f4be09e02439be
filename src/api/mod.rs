//! External collaborators: the Alpaca brokerage and the SEC ticker list.

mod alpaca_client;
mod broker;
mod sec_tickers;
pub mod types;

pub use alpaca_client::AlpacaClient;
pub use broker::Brokerage;
pub use sec_tickers::{parse_ticker_lines, SecTickerClient, TickerSource};

#[cfg(test)]
pub(crate) use broker::mock;
