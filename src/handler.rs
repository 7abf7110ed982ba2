//! Event Interface — the trait consumers implement to receive decoded
//! events from a running [`crate::dispatcher::Dispatcher`].
//!
//! Every method has a no-op default body, so an implementer overrides only
//! the callbacks it cares about.

use rust_decimal::Decimal;

use crate::book::OrderBook;
use crate::types::enums::SystemStatusValue;
use crate::types::{Order, Position, Trade};
use crate::ws::codec::{Candle, SpreadQuote, TickerSnapshot};

/// Receives every event the [`crate::dispatcher::Dispatcher`] decodes.
pub trait EventHandler {
    /// A book snapshot replaced the prior book for `pair`.
    fn on_book_snapshot(&mut self, pair: &str, book: &OrderBook) {
        let _ = (pair, book);
    }

    /// An incremental delta was applied to `pair`'s book.
    fn on_book_delta(&mut self, pair: &str, book: &OrderBook) {
        let _ = (pair, book);
    }

    /// `pair`'s book is crossed (best bid ≥ best ask) after the last delta.
    fn on_book_crossed(&mut self, pair: &str, book: &OrderBook) {
        let _ = (pair, book);
    }

    /// A public trade printed on `pair`.
    fn on_trade(&mut self, pair: &str, price: Decimal, volume: Decimal) {
        let _ = (pair, price, volume);
    }

    /// A new OHLC candle closed (or updated) on `pair`.
    fn on_ohlc(&mut self, pair: &str, candle: &Candle) {
        let _ = (pair, candle);
    }

    /// The top-of-book spread changed on `pair`.
    fn on_spread(&mut self, pair: &str, spread: &SpreadQuote) {
        let _ = (pair, spread);
    }

    /// A full ticker update was received for `pair`.
    fn on_ticker(&mut self, pair: &str, ticker: &TickerSnapshot) {
        let _ = (pair, ticker);
    }

    /// One of the client's own orders received a fill.
    fn on_fill(&mut self, order: &Order, trade: &Trade, position: &Position) {
        let _ = (order, trade, position);
    }

    /// `openOrders` reported a pending notice that was dropped because the
    /// order is already live.
    fn on_open_order_pending(&mut self, order_id: &str) {
        let _ = order_id;
    }

    /// The exchange's `systemStatus` changed.
    fn on_system_status(&mut self, status: SystemStatusValue) {
        let _ = status;
    }

    /// A `subscribe`/`unsubscribe` command was acknowledged or rejected.
    fn on_subscription_status(&mut self, channel: &str, ok: bool, error: Option<&str>) {
        let _ = (channel, ok, error);
    }

    /// A server heartbeat was received.
    fn on_heartbeat(&mut self) {}

    /// A pong was received for a client-issued ping.
    fn on_pong(&mut self, reqid: Option<u64>) {
        let _ = reqid;
    }

    /// A new order was rejected by the exchange.
    fn on_order_rejected(&mut self, clorder_id: u64, reason: &str) {
        let _ = (clorder_id, reason);
    }

    /// A replace was rejected by the exchange.
    fn on_replace_rejected(&mut self, order_id: &str, reason: &str) {
        let _ = (order_id, reason);
    }

    /// A cancel was rejected by the exchange.
    fn on_cancel_rejected(&mut self, reason: &str) {
        let _ = reason;
    }

    /// `cancelAll` completed, canceling `count` orders.
    fn on_cancel_all_status(&mut self, count: u64) {
        let _ = count;
    }

    /// A frame could not be decoded into any known shape.
    fn on_malformed_frame(&mut self, reason: &str) {
        let _ = reason;
    }

    /// A frame decoded but did not match any handled variant.
    fn on_unknown_event(&mut self, raw: &serde_json::Value) {
        let _ = raw;
    }

    /// A non-fatal condition worth surfacing (throttle drop, protocol
    /// violation, etc).
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }
}
