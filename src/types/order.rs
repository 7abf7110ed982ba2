//! The client's view of a single working order.

use rust_decimal::Decimal;

use super::enums::{OrderType, Side, TimeInForce};

/// Where an order currently sits in its lifecycle.
///
/// Mirrors the state machine described for the working-order book: a new
/// order starts as `PendingNew`, is acknowledged into `Open`, optionally
/// passes through `PendingReplace`/`PendingCancel`, and ends in one of the
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderLifecycle {
    PendingNew,
    Open,
    PendingReplace,
    ReplaceRejected,
    PendingCancel,
    PartiallyFilled,
    Filled,
    Canceled,
    Rejected,
}

impl OrderLifecycle {
    /// Terminal states are never transitioned out of.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderLifecycle::Filled | OrderLifecycle::Canceled | OrderLifecycle::Rejected
        )
    }
}

/// A single working order tracked by the [`crate::working_order_book::WorkingOrderBook`].
#[derive(Debug, Clone)]
pub struct Order {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Client-assigned request id this order was most recently keyed by.
    pub clorder_id: u64,
    /// Exchange-assigned order id, present once the first ack has landed.
    pub order_id: Option<String>,
    /// Original order quantity.
    pub orig_qty: Decimal,
    /// Remaining (unfilled) quantity.
    pub qty: Decimal,
    /// Cumulative filled quantity.
    pub cum_qty: Decimal,
    /// Limit price, if any (market orders carry `None`).
    pub price: Option<Decimal>,
    pub lifecycle: OrderLifecycle,
}

impl Order {
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        time_in_force: TimeInForce,
        clorder_id: u64,
        qty: Decimal,
        price: Option<Decimal>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            time_in_force,
            clorder_id,
            order_id: None,
            orig_qty: qty,
            qty,
            cum_qty: Decimal::ZERO,
            price,
            lifecycle: OrderLifecycle::PendingNew,
        }
    }
}
