//! An executed own-trade, as carried by `ownTrades` frames.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::enums::{OrderType, Side};

/// A single fill against one of the client's own orders.
#[derive(Debug, Clone)]
pub struct Trade {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Decimal,
    pub volume: Decimal,
    pub time: DateTime<Utc>,
    /// Exchange order id this fill belongs to.
    pub order_id: String,
}
