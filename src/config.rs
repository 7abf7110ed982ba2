//! Client configuration.
//!
//! [`ClientConfig`] gathers everything the [`crate::dispatcher::Dispatcher`]
//! needs to stand itself up: credentials, endpoint overrides, book depth,
//! throttle rate, and trade-monitor capacity. It never reads environment
//! variables itself — that is left to the caller's bootstrap layer.

use crate::constants::{
    API_BASE_URL, DEFAULT_THROTTLE_RATE, DEFAULT_TRADE_MONITOR_CAPACITY, WS_PRIVATE_URL,
    WS_PUBLIC_URL,
};

/// Configuration for a [`crate::dispatcher::Dispatcher`] instance.
///
/// Construct with [`ClientConfig::new`] and adjust fields with the builder
/// methods before passing to `Dispatcher::connect`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) api_secret: String,
    pub(crate) api_base_url: String,
    pub(crate) ws_public_url: String,
    pub(crate) ws_private_url: String,
    pub(crate) throttle_rate_per_sec: f64,
    pub(crate) trade_monitor_capacity: usize,
}

impl ClientConfig {
    /// Create a configuration from an API key/secret pair, with every other
    /// field set to its production default.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base_url: API_BASE_URL.to_owned(),
            ws_public_url: WS_PUBLIC_URL.to_owned(),
            ws_private_url: WS_PRIVATE_URL.to_owned(),
            throttle_rate_per_sec: DEFAULT_THROTTLE_RATE,
            trade_monitor_capacity: DEFAULT_TRADE_MONITOR_CAPACITY,
        }
    }

    /// Override the REST base URL (used only to mint the WS token).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the public market-data WebSocket URL.
    pub fn with_ws_public_url(mut self, url: impl Into<String>) -> Self {
        self.ws_public_url = url.into();
        self
    }

    /// Override the authenticated order-management WebSocket URL.
    pub fn with_ws_private_url(mut self, url: impl Into<String>) -> Self {
        self.ws_private_url = url.into();
        self
    }

    /// Override the shared throttle rate (messages per second per operation).
    pub fn with_throttle_rate(mut self, per_sec: f64) -> Self {
        self.throttle_rate_per_sec = per_sec;
        self
    }

    /// Override the trade monitor's ring-buffer capacity.
    pub fn with_trade_monitor_capacity(mut self, capacity: usize) -> Self {
        self.trade_monitor_capacity = capacity;
        self
    }

    /// The configured API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The configured API secret (base64-encoded, as issued by the exchange).
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}
