//! Dispatcher — owns both streaming connections plus every piece of
//! reconciled state (order books, the working-order book, position
//! tracker, trade monitor, throttle) and is the single task that drives
//! them all. No other task ever mutates this state, so none of it needs
//! internal locking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;

use crate::book::{self, OrderBook};
use crate::config::ClientConfig;
use crate::constants::{FIRST_REQID, VALID_BOOK_DEPTHS, VALID_OHLC_INTERVALS};
use crate::error::{KrakenError, Result};
use crate::handler::EventHandler;
use crate::position::PositionTracker;
use crate::throttle::Throttle;
use crate::trade_monitor::TradeMonitor;
use crate::types::enums::{AckStatus, OrderType, Side, SubscriptionStatusValue, TimeInForce};
use crate::types::order::OrderLifecycle;
use crate::types::Order;
use crate::working_order_book::{Reconciliation, WorkingOrderBook};
use crate::ws::codec::{self, BookPayload, InboundEvent};
use crate::ws::stream::{Frame, StreamClient};

/// Default per-symbol book depth when a caller subscribes without
/// specifying one.
const DEFAULT_BOOK_DEPTH: usize = 10;

/// Owns the public and private streaming connections and all reconciled
/// client-side state.
pub struct Dispatcher {
    http: reqwest::Client,
    config: ClientConfig,
    token: Arc<str>,
    public: StreamClient,
    private: StreamClient,
    reqid: AtomicU64,
    books: HashMap<String, OrderBook>,
    book_depths: HashMap<String, usize>,
    working_orders: WorkingOrderBook,
    positions: PositionTracker,
    trade_monitors: HashMap<String, TradeMonitor>,
    throttle: Throttle,
    /// Maps a locally-issued `reqid` back to the pair it subscribed/
    /// unsubscribed, so the `subscriptionStatus` ack can be attributed.
    pending_subscriptions: HashMap<u64, String>,
    /// Maps a locally-issued `cancelOrder` `reqid` back to the order ids it
    /// named, so a `cancelOrderStatus(ok)` ack — which carries only the
    /// `reqid`, not the ids — can be reconciled against the Working-Order
    /// Book.
    pending_cancels: HashMap<u64, Vec<String>>,
}

impl Dispatcher {
    /// Mint a session token and open both streaming connections.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::new();
        let token = crate::auth::mint_token(
            &http,
            &config.api_base_url,
            &config.api_key,
            &config.api_secret,
        )
        .await?;

        let public = StreamClient::connect(&config.ws_public_url, "public").await?;
        let private = StreamClient::connect(&config.ws_private_url, "private").await?;
        let throttle = Throttle::new(config.throttle_rate_per_sec);

        Ok(Self {
            http,
            token: Arc::from(token),
            config,
            public,
            private,
            reqid: AtomicU64::new(FIRST_REQID),
            books: HashMap::new(),
            book_depths: HashMap::new(),
            working_orders: WorkingOrderBook::new(),
            positions: PositionTracker::new(),
            trade_monitors: HashMap::new(),
            throttle,
            pending_subscriptions: HashMap::new(),
            pending_cancels: HashMap::new(),
        })
    }

    fn next_reqid(&self) -> u64 {
        self.reqid.fetch_add(1, Ordering::Relaxed)
    }

    // -----------------------------------------------------------------
    // Public commands
    // -----------------------------------------------------------------

    /// Subscribe to a public channel (`book`, `trade`, `ohlc`, `spread`,
    /// `ticker`) for one or more pairs, or a private channel
    /// (`openOrders`, `ownTrades`) which ignores `pairs`.
    pub async fn subscribe(
        &mut self,
        channel: &str,
        pairs: &[&str],
        depth: Option<u32>,
        interval: Option<u32>,
    ) -> Result<()> {
        if let Some(d) = depth {
            if !VALID_BOOK_DEPTHS.contains(&d) {
                return Err(KrakenError::InvalidArgument(format!(
                    "invalid book depth {d}, must be one of {VALID_BOOK_DEPTHS:?}"
                )));
            }
        }
        if let Some(i) = interval {
            if !VALID_OHLC_INTERVALS.contains(&i) {
                return Err(KrakenError::InvalidArgument(format!(
                    "invalid ohlc interval {i}, must be one of {VALID_OHLC_INTERVALS:?}"
                )));
            }
        }

        let is_private = matches!(channel, "openOrders" | "ownTrades");
        let reqid = self.next_reqid();
        if let Some(pair) = pairs.first() {
            self.pending_subscriptions
                .insert(reqid, pair.to_string());
            if channel == "book" {
                self.book_depths
                    .insert(pair.to_string(), depth.unwrap_or(DEFAULT_BOOK_DEPTH as u32) as usize);
            }
        }

        if !self.throttle.allow("subscribe") {
            return Err(KrakenError::ThrottleDrop("subscribe".into()));
        }

        let token = is_private.then_some(&*self.token);
        let frame = codec::encode_subscribe(reqid, pairs, channel, depth, interval, token);
        if is_private {
            self.private.send(frame).await
        } else {
            self.public.send(frame).await
        }
    }

    /// Unsubscribe from a channel.
    pub async fn unsubscribe(&mut self, channel: &str, pairs: &[&str]) -> Result<()> {
        let is_private = matches!(channel, "openOrders" | "ownTrades");
        let reqid = self.next_reqid();
        if !self.throttle.allow("unsubscribe") {
            return Err(KrakenError::ThrottleDrop("unsubscribe".into()));
        }
        let token = is_private.then_some(&*self.token);
        let frame = codec::encode_unsubscribe(reqid, pairs, channel, token);
        if is_private {
            self.private.send(frame).await
        } else {
            self.public.send(frame).await
        }
    }

    /// Submit a new order. Returns the `clorder_id` the order was tagged
    /// with, which the caller correlates against later `on_order_rejected`
    /// or a successful open via [`Dispatcher::order`].
    #[allow(clippy::too_many_arguments)]
    pub async fn new_order_single(
        &mut self,
        pair: &str,
        side: Side,
        order_type: OrderType,
        volume: Decimal,
        price: Option<Decimal>,
        time_in_force: TimeInForce,
    ) -> Result<u64> {
        let reqid = self.next_reqid();
        let order = Order::new(pair, side, order_type, time_in_force, reqid, volume, price);
        // Installed before the frame is sent: an ack racing ahead of the
        // send future's completion must still find a pending entry.
        self.working_orders.register_pending(order);

        if !self.throttle.allow("addOrder") {
            return Err(KrakenError::ThrottleDrop("addOrder".into()));
        }

        let frame = codec::encode_add_order(
            reqid, &self.token, pair, side, order_type, volume, price, time_in_force,
        );
        self.private.send(frame).await?;
        Ok(reqid)
    }

    /// Replace the price/quantity of a working order.
    pub async fn replace_order(
        &mut self,
        pair: &str,
        order_id: &str,
        volume: Decimal,
        price: Option<Decimal>,
    ) -> Result<u64> {
        let reqid = self.next_reqid();
        if !self.throttle.allow("editOrder") {
            return Err(KrakenError::ThrottleDrop("editOrder".into()));
        }
        let frame = codec::encode_edit_order(reqid, &self.token, pair, order_id, volume, price);
        self.private.send(frame).await?;
        Ok(reqid)
    }

    /// Cancel one or more working orders by exchange order id.
    pub async fn cancel_order(&mut self, order_ids: &[&str]) -> Result<u64> {
        let reqid = self.next_reqid();
        if !self.throttle.allow("cancelOrder") {
            return Err(KrakenError::ThrottleDrop("cancelOrder".into()));
        }
        self.pending_cancels.insert(
            reqid,
            order_ids.iter().map(|id| (*id).to_owned()).collect(),
        );
        let frame = codec::encode_cancel_order(reqid, &self.token, order_ids);
        self.private.send(frame).await?;
        Ok(reqid)
    }

    /// Cancel every working order.
    pub async fn cancel_all(&mut self) -> Result<u64> {
        let reqid = self.next_reqid();
        if !self.throttle.allow("cancelAll") {
            return Err(KrakenError::ThrottleDrop("cancelAll".into()));
        }
        let frame = codec::encode_cancel_all(reqid, &self.token);
        self.private.send(frame).await?;
        Ok(reqid)
    }

    /// Arm (or disarm, with `timeout_secs: 0`) a dead-man's-switch that
    /// cancels everything if the client goes silent for `timeout_secs`.
    pub async fn cancel_all_after(&mut self, timeout_secs: u64) -> Result<u64> {
        let reqid = self.next_reqid();
        if !self.throttle.allow("cancelAllAfter") {
            return Err(KrakenError::ThrottleDrop("cancelAllAfter".into()));
        }
        let frame = codec::encode_cancel_all_after(reqid, &self.token, timeout_secs);
        self.private.send(frame).await?;
        Ok(reqid)
    }

    /// Ping the public connection (heartbeat/latency probe).
    pub async fn ping(&mut self) -> Result<u64> {
        let reqid = self.next_reqid();
        let frame = codec::encode_ping(reqid);
        self.public.send(frame).await?;
        Ok(reqid)
    }

    /// Look up a live working order by its exchange order id.
    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.working_orders.get_order(order_id)
    }

    /// Look up a symbol's current book, if one has been built yet.
    pub fn book(&self, pair: &str) -> Option<&OrderBook> {
        self.books.get(pair)
    }

    // -----------------------------------------------------------------
    // Run loop
    // -----------------------------------------------------------------

    /// Drive both streams concurrently until either terminates.
    ///
    /// Only a transport failure ends this loop; every other error
    /// condition (malformed frame, protocol violation, throttle drop,
    /// rejection) is routed to `handler` and the loop continues. Frames
    /// from the two streams carry no ordering guarantee relative to each
    /// other — only within a single stream.
    pub async fn run(&mut self, handler: &mut impl EventHandler) -> Result<()> {
        loop {
            let frame = tokio::select! {
                r = self.public.recv() => r?,
                r = self.private.recv() => r?,
            };
            match frame {
                Frame::Text(text) => self.handle_frame(&text, handler),
                Frame::Closed => return Ok(()),
            }
        }
    }

    fn handle_frame(&mut self, text: &str, handler: &mut impl EventHandler) {
        let event = match codec::decode(text) {
            Ok(e) => e,
            Err(e) => {
                handler.on_malformed_frame(&e.to_string());
                return;
            }
        };
        self.route(event, handler);
    }

    fn route(&mut self, event: InboundEvent, handler: &mut impl EventHandler) {
        match event {
            InboundEvent::SystemStatus { status, .. } => handler.on_system_status(status),
            InboundEvent::SubscriptionStatus {
                reqid,
                channel_name,
                status,
                error_message,
                ..
            } => {
                let pair = reqid.and_then(|r| self.pending_subscriptions.remove(&r));
                let channel = channel_name.or(pair).unwrap_or_default();
                handler.on_subscription_status(
                    &channel,
                    status == SubscriptionStatusValue::Subscribed,
                    error_message.as_deref(),
                );
            }
            InboundEvent::Heartbeat => handler.on_heartbeat(),
            InboundEvent::Ping { .. } => {}
            InboundEvent::Pong { reqid } => handler.on_pong(reqid),
            InboundEvent::AddOrderStatus {
                reqid,
                status,
                txid,
                error_message,
                ..
            } => self.handle_add_order_status(reqid, status, txid, error_message, handler),
            InboundEvent::EditOrderStatus {
                status,
                txid,
                originaltxid,
                error_message,
                ..
            } => self.handle_edit_order_status(status, txid, originaltxid, error_message, handler),
            InboundEvent::CancelOrderStatus {
                reqid,
                status,
                error_message,
            } => self.handle_cancel_order_status(reqid, status, error_message, handler),
            InboundEvent::CancelAllStatus { status, count, error_message, .. } => {
                if status == AckStatus::Ok {
                    handler.on_cancel_all_status(count.unwrap_or(0));
                    self.working_orders.cancel_all();
                } else {
                    handler.on_warning(&format!(
                        "cancelAll rejected: {}",
                        error_message.unwrap_or_default()
                    ));
                }
            }
            InboundEvent::CancelAllAfterStatus { status, error_message, .. } => {
                if status == AckStatus::Error {
                    handler.on_warning(&format!(
                        "cancelAllOrdersAfter rejected: {}",
                        error_message.unwrap_or_default()
                    ));
                }
            }
            InboundEvent::Book { pair, payload } => self.handle_book(pair, payload, handler),
            InboundEvent::Trade { pair, trades } => {
                for t in trades {
                    handler.on_trade(&pair, t.price, t.volume);
                }
            }
            InboundEvent::Ohlc { pair, candle } => handler.on_ohlc(&pair, &candle),
            InboundEvent::Spread { pair, spread } => handler.on_spread(&pair, &spread),
            InboundEvent::Ticker { pair, ticker } => handler.on_ticker(&pair, &ticker),
            InboundEvent::OwnTrades { trades, .. } => {
                for (_, trade) in trades {
                    self.handle_own_trade(trade, handler);
                }
            }
            InboundEvent::OpenOrders { orders, .. } => {
                for update in orders {
                    self.handle_open_order_update(update, handler);
                }
            }
            InboundEvent::Unknown(raw) => handler.on_unknown_event(&raw),
        }
    }

    fn handle_add_order_status(
        &mut self,
        reqid: Option<u64>,
        status: AckStatus,
        txid: Option<String>,
        error_message: Option<String>,
        handler: &mut impl EventHandler,
    ) {
        let Some(reqid) = reqid else {
            handler.on_warning("addOrderStatus missing reqid".into());
            return;
        };
        match status {
            AckStatus::Ok => {
                let Some(order_id) = txid else {
                    handler.on_warning("addOrderStatus ok but missing txid".into());
                    return;
                };
                match self.working_orders.new_order_ack(reqid, order_id) {
                    Reconciliation::UnknownOrder { id } => {
                        handler.on_warning(&format!("ack for unknown clorder_id {id}"));
                    }
                    _ => {}
                }
            }
            AckStatus::Error => {
                self.working_orders.new_order_reject(reqid);
                handler.on_order_rejected(reqid, error_message.as_deref().unwrap_or("rejected"));
            }
        }
    }

    fn handle_edit_order_status(
        &mut self,
        status: AckStatus,
        txid: Option<String>,
        originaltxid: Option<String>,
        error_message: Option<String>,
        handler: &mut impl EventHandler,
    ) {
        let Some(original) = originaltxid else {
            handler.on_warning("editOrderStatus missing originaltxid".into());
            return;
        };
        match status {
            AckStatus::Ok => {
                let Some(new_id) = txid else {
                    handler.on_warning("editOrderStatus ok but missing txid".into());
                    return;
                };
                // Volume/price are authoritative from the order's current
                // working state — Kraken's edit ack does not echo them.
                let (qty, price) = self
                    .working_orders
                    .get_order(&original)
                    .map(|o| (o.qty, o.price))
                    .unwrap_or((Decimal::ZERO, None));
                self.working_orders
                    .replace_order_ack(&original, new_id, qty, price);
            }
            AckStatus::Error => {
                self.working_orders.replace_order_reject(&original);
                handler.on_replace_rejected(
                    &original,
                    error_message.as_deref().unwrap_or("replace rejected"),
                );
            }
        }
    }

    fn handle_cancel_order_status(
        &mut self,
        reqid: Option<u64>,
        status: AckStatus,
        error_message: Option<String>,
        handler: &mut impl EventHandler,
    ) {
        match status {
            AckStatus::Ok => {
                let Some(reqid) = reqid else {
                    handler.on_warning("cancelOrderStatus ok but missing reqid".into());
                    return;
                };
                let Some(order_ids) = self.pending_cancels.remove(&reqid) else {
                    handler.on_warning(&format!(
                        "cancelOrderStatus ok for untracked reqid {reqid}"
                    ));
                    return;
                };
                for order_id in order_ids {
                    if let Reconciliation::UnknownOrder { id } =
                        self.working_orders.cancel_order_ack(&order_id)
                    {
                        handler.on_warning(&format!(
                            "cancelOrderStatus ok for unknown order_id {id}"
                        ));
                    }
                }
            }
            AckStatus::Error => {
                if let Some(reqid) = reqid {
                    self.pending_cancels.remove(&reqid);
                }
                handler.on_cancel_rejected(error_message.as_deref().unwrap_or("cancel rejected"));
            }
        }
    }

    fn handle_book(&mut self, pair: String, payload: BookPayload, handler: &mut impl EventHandler) {
        let depth = *self.book_depths.get(&pair).unwrap_or(&(DEFAULT_BOOK_DEPTH));
        let is_snapshot = matches!(payload, BookPayload::Snapshot { .. });
        let slot = self.books.remove(&pair);
        let mut slot = slot;
        book::apply_payload(&mut slot, depth, &payload);
        if let Some(book) = slot {
            if is_snapshot {
                handler.on_book_snapshot(&pair, &book);
            } else {
                handler.on_book_delta(&pair, &book);
            }
            if book.is_crossed() {
                handler.on_book_crossed(&pair, &book);
            }
            self.books.insert(pair, book);
        }
    }

    fn handle_own_trade(&mut self, trade: crate::types::Trade, handler: &mut impl EventHandler) {
        self.positions
            .add_fill(&trade.symbol, trade.side, trade.volume, trade.price);
        let position = self.positions.get_position(&trade.symbol);

        self.trade_monitors
            .entry(trade.symbol.clone())
            .or_insert_with(|| TradeMonitor::new(self.config.trade_monitor_capacity))
            .update(trade.clone());

        let reconciliation = self.working_orders.fill(&trade.order_id, trade.volume);
        match reconciliation {
            Reconciliation::UnknownOrder { id } => {
                handler.on_warning(&format!("fill for unknown order_id {id}"));
            }
            Reconciliation::Overfilled { order_id } => {
                handler.on_warning(&format!(
                    "fill for order_id {order_id} exceeded remaining quantity; clamped to zero"
                ));
            }
            _ => {}
        }

        if let Some(order) = self.working_orders.get_order(&trade.order_id).cloned() {
            handler.on_fill(&order, &trade, &position);
        } else {
            // Order was fully filled and removed by `fill` above — still
            // report the terminal fill with whatever lifecycle snapshot we
            // can reconstruct.
            let mut synthetic = Order::new(
                trade.symbol.as_str(),
                trade.side,
                trade.order_type,
                TimeInForce::GoodTillCancel,
                0,
                trade.volume,
                Some(trade.price),
            );
            synthetic.order_id = Some(trade.order_id.clone());
            synthetic.lifecycle = OrderLifecycle::Filled;
            handler.on_fill(&synthetic, &trade, &position);
        }
    }

    fn handle_open_order_update(
        &mut self,
        update: codec::OpenOrderUpdate,
        handler: &mut impl EventHandler,
    ) {
        use crate::types::enums::OpenOrderStatus;

        match update.status {
            Some(OpenOrderStatus::Pending) => {
                if let Reconciliation::Applied =
                    self.working_orders.on_open_order_pending(&update.order_id)
                {
                    handler.on_open_order_pending(&update.order_id);
                }
            }
            Some(OpenOrderStatus::Open) => {
                let _ = self.working_orders.on_open_order_new(&update.order_id);
            }
            Some(OpenOrderStatus::Canceled) | Some(OpenOrderStatus::Expired) => {
                if let Reconciliation::UnknownOrder { id } =
                    self.working_orders.on_open_order_cancel(&update.order_id)
                {
                    handler.on_warning(&format!(
                        "openOrders canceled notice for untracked order {id}"
                    ));
                }
            }
            Some(OpenOrderStatus::Closed) | None => {}
        }
    }
}
