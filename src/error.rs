//! Error types for the `kraken-trader-core` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, KrakenError>`.
//!
//! [`KrakenError`] covers:
//! - **Transport failures** — the WebSocket connection closed or errored
//! - **Auth failures** — token minting failed or was rejected
//! - **Malformed frames** — a frame could not be decoded into a known shape
//! - **Protocol violations** — a decoded frame referred to state that does
//!   not exist (unknown order id, crossed book, etc.)
//! - **Throttle drops** — a command was suppressed by the local rate limiter
//! - **Rejections** — the exchange rejected an order-lifecycle command
//! - **Invalid arguments** — client-side validation errors (bad depth, etc.)

use std::fmt;

/// Error response returned by the exchange's REST auth endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Raw `error` array as returned by the exchange (may be empty on success).
    #[serde(default)]
    pub error: Vec<String>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_empty() {
            write!(f, "unknown error")
        } else {
            write!(f, "{}", self.error.join("; "))
        }
    }
}

/// All possible errors produced by the `kraken-trader-core` client.
#[derive(Debug, thiserror::Error)]
pub enum KrakenError {
    /// A streaming connection closed or failed. Aborts the dispatcher loop.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// Token minting failed, or the exchange rejected our credentials.
    /// Aborts the dispatcher loop.
    #[error("auth failure: {0}")]
    AuthFailure(String),

    /// A frame could not be matched against any known wire shape.
    #[error("malformed frame: {reason} ({raw})")]
    MalformedFrame {
        /// Human-readable description of what made the frame unrecognizable.
        reason: String,
        /// The raw JSON value, for diagnostics.
        raw: serde_json::Value,
    },

    /// A decoded frame referenced state the client does not recognize
    /// (e.g. a cancel ack for an order_id never seen as pending or open).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A locally-issued command was suppressed by the throttle.
    #[error("throttled: {0} dropped")]
    ThrottleDrop(String),

    /// The client is not connected to the stream this operation requires.
    #[error("not connected")]
    NotConnected,

    /// The exchange rejected an order-lifecycle command.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The caller provided an invalid argument (bad depth, interval, etc).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The book side (bids/asks) queried has no levels.
    #[error("book side is empty")]
    EmptySide,

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON response or frame body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A WebSocket-level error from `tokio-tungstenite`.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KrakenError>;
