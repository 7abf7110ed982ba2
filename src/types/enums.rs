//! Wire enumerations for the Kraken-style WebSocket API v1.

use serde::{Deserialize, Serialize};

/// Which side of the book/trade an order or fill is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `true` for [`Side::Sell`] — the sign to apply to a fill's quantity
    /// when folding it into a running position.
    pub fn is_sell(self) -> bool {
        matches!(self, Side::Sell)
    }
}

/// Order type, as accepted by `addOrder` and echoed back on acks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Market,
    Limit,
    #[serde(rename = "stop-loss")]
    StopLoss,
    #[serde(rename = "take-profit")]
    TakeProfit,
    #[serde(rename = "stop-loss-limit")]
    StopLossLimit,
    #[serde(rename = "take-profit-limit")]
    TakeProfitLimit,
    #[serde(rename = "settle-position")]
    SettlePosition,
}

/// Time-in-force qualifier for a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    GoodTillCancel,
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    #[serde(rename = "GTD")]
    GoodTillDate,
}

impl Default for TimeInForce {
    fn default() -> Self {
        TimeInForce::GoodTillCancel
    }
}

/// `status` field carried by `systemStatus` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatusValue {
    Online,
    Maintenance,
    CancelOnly,
    LimitOnly,
    PostOnly,
}

/// `status` field carried by `subscriptionStatus` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatusValue {
    Subscribed,
    Unsubscribed,
    Error,
}

/// `status` field carried by order-lifecycle ack events
/// (`addOrderStatus`, `editOrderStatus`, `cancelOrderStatus`, `cancelAllStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Ok,
    Error,
}

/// Status string carried by `openOrders` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenOrderStatus {
    Pending,
    Open,
    Closed,
    Canceled,
    Expired,
}
