//! Tweet-driven stock trading bot.
//!
//! Extracts ticker symbols from a tweet, risk-sizes a position for each,
//! places entry orders through the Alpaca API, and attaches trailing-stop
//! exits once the entries fill.

mod api;
mod models;
mod server;
mod trading;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{AlpacaClient, SecTickerClient};
use crate::server::AppState;
use crate::trading::{PollPolicy, TradeEngine, TradingConfig};

/// Tweet-trading bot CLI.
#[derive(Parser)]
#[command(name = "tweet-trader")]
#[command(about = "Trade stock tickers mentioned in tweets", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tweet webhook server
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        bind: String,
    },

    /// Process a single tweet from the command line
    Process {
        /// Tweet text, e.g. "$GHSI to the moon"
        tweet: String,
    },

    /// Show the active trading configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = TradingConfig::default();
    let poll = PollPolicy::default();

    match cli.command {
        Commands::Serve { bind } => {
            let engine = build_engine(config, poll)?;
            let state = Arc::new(AppState { engine });

            info!(bind = %bind, "Starting tweet webhook");
            server::serve(state, &bind).await?;
        }

        Commands::Process { tweet } => {
            let engine = build_engine(config, poll)?;

            let success = engine.process_tweet(&tweet).await?;
            println!("success: {}", success);
        }

        Commands::Config => {
            println!("\n=== Trading Configuration ===\n");
            println!("Position Sizing:");
            println!("  Account Risk:     {}%", config.account_risk_fraction * rust_decimal::Decimal::from(100));
            println!("  Trade Risk:       {}", config.trade_risk);

            println!("\nOrder Shaping:");
            println!("  Take Profit:      x{}", config.take_profit_multiplier);
            println!("  Stop Price:       x{}", config.stop_price_multiplier);
            println!("  Stop Limit:       x{}", config.stop_limit_multiplier);
            println!("  Trail Percent:    {}%", config.trail_percent);
            println!("  Day-Trade Limit:  {}", config.day_trade_limit);

            println!("\nFill Polling:");
            println!("  Max Attempts:     {}", poll.max_attempts);
            println!("  Delay:            {:?}", poll.delay);
        }
    }

    Ok(())
}

/// Wire up the production engine: Alpaca credentials from the environment,
/// reference tickers from the SEC.
fn build_engine(config: TradingConfig, poll: PollPolicy) -> Result<TradeEngine> {
    let broker = AlpacaClient::from_env()?;
    let tickers = SecTickerClient::new()?;

    Ok(TradeEngine::new(
        Arc::new(broker),
        Arc::new(tickers),
        config,
        poll,
    ))
}
