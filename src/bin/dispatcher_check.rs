//! Connect to the exchange, subscribe to a public book channel, and print
//! decoded events for a few seconds.
//!
//! # Usage
//!
//! ```sh
//! export KRAKEN_API_KEY="your-api-key"
//! export KRAKEN_API_SECRET="your-api-secret"
//! cargo run --bin dispatcher_check --features cli -- XBT/USD
//! ```

use std::env;
use std::time::Duration;

use kraken_trader_core::config::ClientConfig;
use kraken_trader_core::dispatcher::Dispatcher;
use kraken_trader_core::handler::EventHandler;

struct PrintingHandler;

impl EventHandler for PrintingHandler {
    fn on_book_snapshot(&mut self, pair: &str, book: &kraken_trader_core::book::OrderBook) {
        println!(
            "{pair} snapshot: best_bid={:?} best_ask={:?}",
            book.best_bid().ok(),
            book.best_ask().ok()
        );
    }

    fn on_book_delta(&mut self, pair: &str, book: &kraken_trader_core::book::OrderBook) {
        println!(
            "{pair} delta: best_bid={:?} best_ask={:?}",
            book.best_bid().ok(),
            book.best_ask().ok()
        );
    }

    fn on_system_status(&mut self, status: kraken_trader_core::types::SystemStatusValue) {
        println!("system status: {status:?}");
    }
}

#[tokio::main]
async fn main() -> kraken_trader_core::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let api_key = env::var("KRAKEN_API_KEY").expect("set KRAKEN_API_KEY env var before running");
    let api_secret =
        env::var("KRAKEN_API_SECRET").expect("set KRAKEN_API_SECRET env var before running");
    let pair = env::args().nth(1).unwrap_or_else(|| "XBT/USD".to_owned());

    let config = ClientConfig::new(api_key, api_secret);
    let mut dispatcher = Dispatcher::connect(config).await?;

    println!("Subscribing to book-10 for {pair}…");
    dispatcher
        .subscribe("book", &[pair.as_str()], Some(10), None)
        .await?;

    let mut handler = PrintingHandler;
    tokio::select! {
        result = dispatcher.run(&mut handler) => result?,
        _ = tokio::time::sleep(Duration::from_secs(10)) => {
            println!("10 seconds elapsed — exiting.");
        }
    }

    Ok(())
}
