//! Working-Order Book — reconciles the client's intended order state
//! against exchange acknowledgements that can arrive, in any order,
//! across two independently-sequenced streams (the private order
//! acknowledgement stream and the `openOrders` push stream).
//!
//! Keyed two ways, matching the reconciliation the exchange itself
//! requires: `pendings` by the client-generated `clorder_id` (the only
//! identifier known before the first ack lands) and `orders` by the
//! exchange-assigned `order_id` (the only identifier `openOrders` and
//! `ownTrades` carry). `canceled_order_ids` absorbs cancel acks that race
//! ahead of (or arrive instead of) a terminal `openOrders` notice, so a
//! later, redundant notice for the same id is recognized as already
//! handled rather than logged as a protocol violation.
use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::types::order::OrderLifecycle;
use crate::types::Order;

/// Reconciles client-issued order commands against exchange acks.
#[derive(Debug, Default)]
pub struct WorkingOrderBook {
    /// Orders that have been sent but not yet assigned an `order_id`,
    /// keyed by the `clorder_id` the command was tagged with.
    pendings: HashMap<u64, Order>,
    /// Orders with a known exchange `order_id`.
    orders: HashMap<String, Order>,
    /// Order ids whose cancellation has already been acknowledged, kept so
    /// a late `openOrders: canceled` notice for the same id is recognized
    /// as a duplicate rather than an unknown-order protocol violation.
    ///
    /// `cancel_all` intentionally does **not** populate this set: it only
    /// clears `orders` directly. A subsequent `openOrders` cancel notice
    /// for one of those ids will therefore be logged as a protocol
    /// violation rather than silently absorbed — this mirrors the
    /// asymmetry in the reconciliation logic this module is modeled on.
    canceled_order_ids: HashSet<String>,
}

/// What the caller should do in response to a reconciliation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Nothing of note — state was updated silently.
    Applied,
    /// The notice referred to an id this book has no record of.
    UnknownOrder { id: String },
    /// A pending notice arrived for an order already tracked as live;
    /// dropped without overwriting the live entry. Benign and expected
    /// when `openOrders` redelivers a pending notice after the ack landed.
    RedundantPending { order_id: String },
    /// The order's remaining quantity reached zero via fills.
    FullyFilled { order_id: String },
    /// A fill reported more quantity than the order had remaining; `qty`
    /// was clamped to zero and the order treated as fully filled.
    Overfilled { order_id: String },
}

impl WorkingOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new order as pending, before its command frame is sent.
    /// Must be called before the command is transmitted so an ack that
    /// arrives before the send future resolves still finds a pending entry.
    pub fn register_pending(&mut self, order: Order) {
        self.pendings.insert(order.clorder_id, order);
    }

    /// The private stream acknowledged a new order: promote the pending
    /// entry (keyed by `clorder_id`) into a live order keyed by `order_id`.
    pub fn new_order_ack(&mut self, clorder_id: u64, order_id: String) -> Reconciliation {
        let Some(mut order) = self.pendings.remove(&clorder_id) else {
            return Reconciliation::UnknownOrder {
                id: clorder_id.to_string(),
            };
        };
        order.order_id = Some(order_id.clone());
        order.lifecycle = OrderLifecycle::Open;
        self.orders.insert(order_id, order);
        Reconciliation::Applied
    }

    /// The private stream rejected a new order.
    pub fn new_order_reject(&mut self, clorder_id: u64) -> Reconciliation {
        match self.pendings.get_mut(&clorder_id) {
            Some(order) => {
                order.lifecycle = OrderLifecycle::Rejected;
                Reconciliation::Applied
            }
            None => Reconciliation::UnknownOrder {
                id: clorder_id.to_string(),
            },
        }
    }

    /// The private stream acknowledged a replace. Per the replace
    /// semantics this book implements, only `qty` and `price` are
    /// overwritten — `cum_qty` is left untouched, since a price/quantity
    /// replace does not undo fills already applied.
    pub fn replace_order_ack(
        &mut self,
        old_order_id: &str,
        new_order_id: String,
        qty: Decimal,
        price: Option<Decimal>,
    ) -> Reconciliation {
        let Some(mut order) = self.orders.remove(old_order_id) else {
            return Reconciliation::UnknownOrder {
                id: old_order_id.to_owned(),
            };
        };
        order.order_id = Some(new_order_id.clone());
        order.qty = qty;
        order.price = price;
        order.lifecycle = OrderLifecycle::Open;
        self.orders.insert(new_order_id, order);
        Reconciliation::Applied
    }

    /// The private stream rejected a replace — the original order remains
    /// live with its pre-replace terms.
    pub fn replace_order_reject(&mut self, order_id: &str) -> Reconciliation {
        match self.orders.get_mut(order_id) {
            Some(order) => {
                order.lifecycle = OrderLifecycle::ReplaceRejected;
                Reconciliation::Applied
            }
            None => Reconciliation::UnknownOrder {
                id: order_id.to_owned(),
            },
        }
    }

    /// The private stream acknowledged a cancel for one order id.
    ///
    /// A second cancel ack for an id already in `canceled_order_ids` is
    /// treated as a no-op `Applied` rather than `UnknownOrder` — cancel
    /// acks are idempotent by design.
    pub fn cancel_order_ack(&mut self, order_id: &str) -> Reconciliation {
        if self.canceled_order_ids.contains(order_id) {
            return Reconciliation::Applied;
        }
        let found = self.orders.remove(order_id).is_some();
        self.canceled_order_ids.insert(order_id.to_owned());
        if found {
            Reconciliation::Applied
        } else {
            Reconciliation::UnknownOrder {
                id: order_id.to_owned(),
            }
        }
    }

    /// All working orders were canceled at once. Clears `orders` directly
    /// without touching `canceled_order_ids` — see that field's doc
    /// comment for why a later notice for one of these ids still surfaces
    /// as a protocol violation.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.orders.len();
        self.orders.clear();
        count
    }

    /// `openOrders` reported a pending notice for `order_id`.
    ///
    /// If the id already names a live order, the notice is dropped without
    /// overwriting the live entry — `openOrders` can redeliver a pending
    /// notice after the direct ack already promoted the order, and the
    /// direct ack is authoritative.
    pub fn on_open_order_pending(&mut self, order_id: &str) -> Reconciliation {
        if self.orders.contains_key(order_id) {
            return Reconciliation::RedundantPending {
                order_id: order_id.to_owned(),
            };
        }
        Reconciliation::Applied
    }

    /// `openOrders` reported this order as newly open/acknowledged —
    /// used when the `openOrders` push beats the direct `addOrderStatus`
    /// ack to the client, in which case there is no pending entry to
    /// promote and this is a no-op beyond confirming the id is tracked.
    pub fn on_open_order_new(&mut self, order_id: &str) -> Reconciliation {
        if self.orders.contains_key(order_id) {
            Reconciliation::Applied
        } else {
            Reconciliation::UnknownOrder {
                id: order_id.to_owned(),
            }
        }
    }

    /// `openOrders` reported this order as canceled.
    pub fn on_open_order_cancel(&mut self, order_id: &str) -> Reconciliation {
        if self.canceled_order_ids.contains(order_id) {
            return Reconciliation::Applied;
        }
        let found = self.orders.remove(order_id).is_some();
        self.canceled_order_ids.insert(order_id.to_owned());
        if found {
            Reconciliation::Applied
        } else {
            Reconciliation::UnknownOrder {
                id: order_id.to_owned(),
            }
        }
    }

    /// Apply a fill: decrement remaining quantity, increment cumulative
    /// quantity, and remove the order once fully filled.
    pub fn fill(&mut self, order_id: &str, fill_qty: Decimal) -> Reconciliation {
        let Some(order) = self.orders.get_mut(order_id) else {
            return Reconciliation::UnknownOrder {
                id: order_id.to_owned(),
            };
        };
        let remaining = order.qty - fill_qty;
        order.cum_qty += fill_qty;
        if remaining < Decimal::ZERO {
            // Exchange reported more fill quantity than the order had
            // left — clamp to zero rather than let qty go negative, and
            // flag the desync for the caller to log.
            order.qty = Decimal::ZERO;
            order.lifecycle = OrderLifecycle::Filled;
            self.orders.remove(order_id);
            return Reconciliation::Overfilled {
                order_id: order_id.to_owned(),
            };
        }
        order.qty = remaining;
        if remaining.is_zero() {
            order.lifecycle = OrderLifecycle::Filled;
            self.orders.remove(order_id);
            Reconciliation::FullyFilled {
                order_id: order_id.to_owned(),
            }
        } else {
            order.lifecycle = OrderLifecycle::PartiallyFilled;
            Reconciliation::Applied
        }
    }

    pub fn get_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn get_pending(&self, clorder_id: u64) -> Option<&Order> {
        self.pendings.get(&clorder_id)
    }

    pub fn open_order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::enums::{OrderType, Side, TimeInForce};
    use rust_decimal_macros::dec;

    fn sample_order(clorder_id: u64) -> Order {
        Order::new(
            "XBT/USD",
            Side::Buy,
            OrderType::Limit,
            TimeInForce::GoodTillCancel,
            clorder_id,
            dec!(1),
            Some(dec!(30000)),
        )
    }

    #[test]
    fn new_order_ack_promotes_pending_to_open() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        let result = wob.new_order_ack(1, "OID-1".into());
        assert_eq!(result, Reconciliation::Applied);
        assert!(wob.get_pending(1).is_none());
        assert_eq!(wob.get_order("OID-1").unwrap().lifecycle, OrderLifecycle::Open);
    }

    #[test]
    fn replace_ack_keeps_cum_qty() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        wob.new_order_ack(1, "OID-1".into());
        wob.fill("OID-1", dec!(0.4));
        assert_eq!(wob.get_order("OID-1").unwrap().cum_qty, dec!(0.4));

        wob.replace_order_ack("OID-1", "OID-2".into(), dec!(2), Some(dec!(31000)));
        let order = wob.get_order("OID-2").unwrap();
        assert_eq!(order.cum_qty, dec!(0.4), "replace must not reset cum_qty");
        assert_eq!(order.qty, dec!(2));
        assert_eq!(order.price, Some(dec!(31000)));
    }

    #[test]
    fn cancel_ack_is_idempotent() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        wob.new_order_ack(1, "OID-1".into());
        assert_eq!(wob.cancel_order_ack("OID-1"), Reconciliation::Applied);
        assert_eq!(wob.cancel_order_ack("OID-1"), Reconciliation::Applied);
    }

    #[test]
    fn cancel_all_does_not_populate_canceled_ids() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        wob.new_order_ack(1, "OID-1".into());
        assert_eq!(wob.cancel_all(), 1);
        // A later openOrders cancel notice for the same id is NOT
        // recognized as already-handled — this is the documented asymmetry.
        assert_eq!(
            wob.on_open_order_cancel("OID-1"),
            Reconciliation::UnknownOrder {
                id: "OID-1".to_owned()
            }
        );
    }

    #[test]
    fn pending_notice_for_live_order_is_dropped_not_overwritten() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        wob.new_order_ack(1, "OID-1".into());
        let result = wob.on_open_order_pending("OID-1");
        assert_eq!(
            result,
            Reconciliation::RedundantPending {
                order_id: "OID-1".to_owned()
            }
        );
        assert_eq!(wob.get_order("OID-1").unwrap().lifecycle, OrderLifecycle::Open);
    }

    #[test]
    fn fill_to_zero_removes_order() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        wob.new_order_ack(1, "OID-1".into());
        let result = wob.fill("OID-1", dec!(1));
        assert_eq!(
            result,
            Reconciliation::FullyFilled {
                order_id: "OID-1".to_owned()
            }
        );
        assert!(wob.get_order("OID-1").is_none());
    }

    #[test]
    fn overfill_clamps_to_zero_instead_of_going_negative() {
        let mut wob = WorkingOrderBook::new();
        wob.register_pending(sample_order(1));
        wob.new_order_ack(1, "OID-1".into());
        let result = wob.fill("OID-1", dec!(1.5));
        assert_eq!(
            result,
            Reconciliation::Overfilled {
                order_id: "OID-1".to_owned()
            }
        );
        assert!(wob.get_order("OID-1").is_none());
    }
}
