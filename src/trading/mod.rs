//! Trading pipeline: extraction, sizing, submission, and exit attachment.

mod config;
mod engine;
mod exits;
mod extractor;
mod sizer;
mod submitter;

pub use config::TradingConfig;
pub use engine::TradeEngine;
pub use exits::{ExitAttacher, PollPolicy};
pub use extractor::extract_tickers;
pub use sizer::{PositionSizer, SizeDecision, SkipReason};
pub use submitter::{OrderSubmitter, SubmitError};
