//! Constants for the Kraken-style WebSocket API v1.
//!
//! Contains base URLs, channel whitelists, and rate limit defaults. These
//! are used internally by [`crate::auth`] and [`crate::dispatcher`] but are
//! also exported for advanced usage.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Base URL for the exchange's REST API (used only to mint a WS token).
pub const API_BASE_URL: &str = "https://api.kraken.com";

/// Public market-data WebSocket endpoint.
pub const WS_PUBLIC_URL: &str = "wss://ws.kraken.com";

/// Authenticated order-management WebSocket endpoint.
pub const WS_PRIVATE_URL: &str = "wss://ws-auth.kraken.com";

/// REST path used to mint a WebSocket authentication token.
pub const GET_WEBSOCKETS_TOKEN_PATH: &str = "/0/private/GetWebSocketsToken";

// ---------------------------------------------------------------------------
// Channel whitelists
// ---------------------------------------------------------------------------

/// Valid `book-*` subscription depths.
pub const VALID_BOOK_DEPTHS: &[u32] = &[10, 25, 100, 500, 1000];

/// Valid `ohlc-*` candle intervals, in minutes.
pub const VALID_OHLC_INTERVALS: &[u32] = &[1, 5, 15, 30, 60, 240, 1440, 10080, 21600];

// ---------------------------------------------------------------------------
// Rate limits / sequencing
// ---------------------------------------------------------------------------

/// First `reqid` issued by a freshly constructed [`crate::dispatcher::Dispatcher`].
pub const FIRST_REQID: u64 = 10_000_000_001;

/// Default throttle rate (messages per second) shared by all order-lifecycle
/// operations unless [`crate::config::ClientConfig`] overrides it.
pub const DEFAULT_THROTTLE_RATE: f64 = 1.0;

/// Default capacity of the [`crate::trade_monitor::TradeMonitor`] ring buffer.
pub const DEFAULT_TRADE_MONITOR_CAPACITY: usize = 100;
