//! # kraken-trader-core
//!
//! The core of a market-making / trading client for a Kraken-style
//! exchange: a wire codec for the WebSocket API v1, a generic streaming
//! transport, a token minter, an L2 order book, a working-order
//! reconciliation book, a position tracker, a trade monitor, a throttle,
//! and a dispatcher that ties them together behind one event-handler
//! trait.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kraken_trader_core::config::ClientConfig;
//! use kraken_trader_core::dispatcher::Dispatcher;
//! use kraken_trader_core::handler::EventHandler;
//!
//! struct Logger;
//! impl EventHandler for Logger {}
//!
//! #[tokio::main]
//! async fn main() -> kraken_trader_core::error::Result<()> {
//!     let config = ClientConfig::new("api-key", "api-secret");
//!     let mut dispatcher = Dispatcher::connect(config).await?;
//!     dispatcher.subscribe("book", &["XBT/USD"], Some(10), None).await?;
//!     dispatcher.run(&mut Logger).await
//! }
//! ```

pub mod auth;
pub mod book;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod position;
pub mod throttle;
pub mod trade_monitor;
pub mod types;
pub mod working_order_book;
pub mod ws;

/// Re-export the main entry point at crate root for convenience.
pub use dispatcher::Dispatcher;
/// Re-export the error type and Result alias.
pub use error::{KrakenError, Result};
