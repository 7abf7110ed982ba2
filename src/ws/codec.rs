//! Wire Codec — decodes raw WebSocket text frames into [`InboundEvent`]s and
//! encodes outbound commands into the JSON envelopes the exchange expects.
//!
//! Two wire shapes exist: tagged JSON *objects* (discriminated by an
//! `"event"` field — system status, subscription acks, heartbeats, and every
//! order-lifecycle ack) and positional JSON *arrays* (market-data and
//! private-feed updates, discriminated by shape and a trailing channel-name
//! string). Decoding goes through `serde_json::Value` first so a single
//! function can dispatch on whichever shape arrived, following the same
//! "parse to a dynamic value, then match into a typed variant" approach the
//! exchange's own binary feed packets are matched on elsewhere in this
//! crate's sibling market-data parsers.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::error::{KrakenError, Result};
use crate::types::enums::{AckStatus, OpenOrderStatus, SubscriptionStatusValue, SystemStatusValue};
use crate::types::Trade;

/// One level change in an L2 book update: either a new/overwritten level or
/// a level to remove (volume of zero).
#[derive(Debug, Clone)]
pub struct BookLevel {
    pub price: Decimal,
    pub volume: Decimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// The payload of a `book-*` frame: either a full snapshot or an
/// incremental delta for one or both sides.
#[derive(Debug, Clone)]
pub enum BookPayload {
    Snapshot {
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
    },
    Update {
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
        checksum: Option<String>,
    },
}

/// Every frame shape this client understands, decoded from the wire.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    SystemStatus {
        connection_id: Option<u64>,
        status: SystemStatusValue,
        version: Option<String>,
    },
    SubscriptionStatus {
        channel_id: Option<u64>,
        channel_name: Option<String>,
        pair: Option<String>,
        status: SubscriptionStatusValue,
        reqid: Option<u64>,
        error_message: Option<String>,
    },
    Heartbeat,
    Ping {
        reqid: Option<u64>,
    },
    Pong {
        reqid: Option<u64>,
    },
    AddOrderStatus {
        reqid: Option<u64>,
        status: AckStatus,
        txid: Option<String>,
        descr: Option<String>,
        error_message: Option<String>,
    },
    EditOrderStatus {
        reqid: Option<u64>,
        status: AckStatus,
        txid: Option<String>,
        originaltxid: Option<String>,
        error_message: Option<String>,
    },
    CancelOrderStatus {
        reqid: Option<u64>,
        status: AckStatus,
        error_message: Option<String>,
    },
    CancelAllStatus {
        reqid: Option<u64>,
        status: AckStatus,
        count: Option<u64>,
        error_message: Option<String>,
    },
    CancelAllAfterStatus {
        reqid: Option<u64>,
        status: AckStatus,
        current_time: Option<String>,
        trigger_time: Option<String>,
        error_message: Option<String>,
    },
    Book {
        pair: String,
        payload: BookPayload,
    },
    Trade {
        pair: String,
        trades: Vec<PublicTrade>,
    },
    OwnTrades {
        trades: Vec<(String, Trade)>,
        sequence: Option<u64>,
    },
    OpenOrders {
        orders: Vec<OpenOrderUpdate>,
        sequence: Option<u64>,
    },
    Ohlc {
        pair: String,
        candle: Candle,
    },
    Spread {
        pair: String,
        spread: SpreadQuote,
    },
    Ticker {
        pair: String,
        ticker: Box<TickerSnapshot>,
    },
    Unknown(Value),
}

/// One OHLC candle from the `ohlc-*` channel.
#[derive(Debug, Clone)]
pub struct Candle {
    pub time: chrono::DateTime<chrono::Utc>,
    pub etime: chrono::DateTime<chrono::Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub vwap: Decimal,
    pub volume: Decimal,
    pub count: u64,
}

/// A top-of-book snapshot from the `spread` channel.
#[derive(Debug, Clone)]
pub struct SpreadQuote {
    pub bid: Decimal,
    pub ask: Decimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub bid_volume: Decimal,
    pub ask_volume: Decimal,
}

/// A full ticker update from the `ticker` channel. Mirrors Kraken's
/// today/last-24h pairing for the rolling statistics fields.
#[derive(Debug, Clone)]
pub struct TickerSnapshot {
    pub ask_price: Decimal,
    pub ask_whole_lot_volume: Decimal,
    pub ask_lot_volume: Decimal,
    pub bid_price: Decimal,
    pub bid_whole_lot_volume: Decimal,
    pub bid_lot_volume: Decimal,
    pub close_price: Decimal,
    pub close_lot_volume: Decimal,
    pub volume_today: Decimal,
    pub volume_last_24h: Decimal,
    pub vwap_today: Decimal,
    pub vwap_last_24h: Decimal,
    pub trades_today: u64,
    pub trades_last_24h: u64,
    pub low_today: Decimal,
    pub low_last_24h: Decimal,
    pub high_today: Decimal,
    pub high_last_24h: Decimal,
    pub open_today: Decimal,
    pub open_last_24h: Decimal,
}

/// One trade print on the public `trade` channel.
#[derive(Debug, Clone)]
pub struct PublicTrade {
    pub price: Decimal,
    pub volume: Decimal,
    pub time: chrono::DateTime<chrono::Utc>,
    pub side: crate::types::Side,
    pub order_type: crate::types::OrderType,
}

/// One entry from a private `openOrders` update: the exchange order id plus
/// whatever subset of fields this update carries.
#[derive(Debug, Clone)]
pub struct OpenOrderUpdate {
    pub order_id: String,
    pub status: Option<OpenOrderStatus>,
    pub cum_qty: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub userref: Option<u64>,
    pub reason: Option<String>,
}

/// Decode one raw WebSocket text frame into an [`InboundEvent`].
///
/// Never returns `Err` for frame shapes it doesn't recognize — those come
/// back as `Ok(InboundEvent::Unknown(value))` so the dispatcher can log and
/// move on rather than aborting the stream over a forward-compatible field
/// the exchange added after this client was written. `Err` is reserved for
/// frames that are not even valid JSON.
pub fn decode(text: &str) -> Result<InboundEvent> {
    let value: Value = serde_json::from_str(text)?;
    if let Some(obj) = value.as_object() {
        return Ok(decode_object(obj, &value));
    }
    if let Some(arr) = value.as_array() {
        return decode_array(arr, &value);
    }
    Ok(InboundEvent::Unknown(value))
}

fn decode_object(obj: &serde_json::Map<String, Value>, raw: &Value) -> InboundEvent {
    let event = match obj.get("event").and_then(Value::as_str) {
        Some(e) => e,
        None => return InboundEvent::Unknown(raw.clone()),
    };

    let reqid = obj.get("reqid").and_then(Value::as_u64);
    let error_message = obj
        .get("errorMessage")
        .and_then(Value::as_str)
        .map(str::to_owned);

    match event {
        "systemStatus" => InboundEvent::SystemStatus {
            connection_id: obj.get("connectionID").and_then(Value::as_u64),
            status: obj
                .get("status")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or(SystemStatusValue::Online),
            version: obj
                .get("version")
                .and_then(Value::as_str)
                .map(str::to_owned),
        },
        "subscriptionStatus" => InboundEvent::SubscriptionStatus {
            channel_id: obj.get("channelID").and_then(Value::as_u64),
            channel_name: obj
                .get("channelName")
                .and_then(Value::as_str)
                .map(str::to_owned),
            pair: obj.get("pair").and_then(Value::as_str).map(str::to_owned),
            status: obj
                .get("status")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or(SubscriptionStatusValue::Error),
            reqid,
            error_message,
        },
        "heartbeat" => InboundEvent::Heartbeat,
        "ping" => InboundEvent::Ping { reqid },
        "pong" => InboundEvent::Pong { reqid },
        "addOrderStatus" => InboundEvent::AddOrderStatus {
            reqid,
            status: ack_status(obj),
            txid: obj.get("txid").and_then(Value::as_str).map(str::to_owned),
            descr: obj.get("descr").and_then(Value::as_str).map(str::to_owned),
            error_message,
        },
        "editOrderStatus" => InboundEvent::EditOrderStatus {
            reqid,
            status: ack_status(obj),
            txid: obj.get("txid").and_then(Value::as_str).map(str::to_owned),
            originaltxid: obj
                .get("originaltxid")
                .and_then(Value::as_str)
                .map(str::to_owned),
            error_message,
        },
        "cancelOrderStatus" => InboundEvent::CancelOrderStatus {
            reqid,
            status: ack_status(obj),
            error_message,
        },
        "cancelAllStatus" => InboundEvent::CancelAllStatus {
            reqid,
            status: ack_status(obj),
            count: obj.get("count").and_then(Value::as_u64),
            error_message,
        },
        "cancelAllAfterStatus" => InboundEvent::CancelAllAfterStatus {
            reqid,
            status: ack_status(obj),
            current_time: obj
                .get("currentTime")
                .and_then(Value::as_str)
                .map(str::to_owned),
            trigger_time: obj
                .get("triggerTime")
                .and_then(Value::as_str)
                .map(str::to_owned),
            error_message,
        },
        _ => InboundEvent::Unknown(raw.clone()),
    }
}

fn ack_status(obj: &serde_json::Map<String, Value>) -> AckStatus {
    obj.get("status")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or(AckStatus::Error)
}

fn decode_array(arr: &[Value], raw: &Value) -> Result<InboundEvent> {
    if arr.len() < 3 {
        return Ok(InboundEvent::Unknown(raw.clone()));
    }
    let last = arr.last().and_then(Value::as_str);
    let second_last = arr.get(arr.len() - 2).and_then(Value::as_str);

    // Private feeds: [updates, "openOrders"|"ownTrades", {sequence}] — no
    // pair, no leading numeric channel id.
    if arr[0].is_array() && matches!(last, Some("openOrders") | Some("ownTrades")) {
        let sequence = arr
            .get(2)
            .and_then(Value::as_object)
            .and_then(|o| o.get("sequence"))
            .and_then(Value::as_u64);
        return match last {
            Some("openOrders") => Ok(InboundEvent::OpenOrders {
                orders: decode_open_orders(&arr[0])?,
                sequence,
            }),
            Some("ownTrades") => Ok(InboundEvent::OwnTrades {
                trades: decode_own_trades(&arr[0])?,
                sequence,
            }),
            _ => unreachable!(),
        };
    }

    // Public feeds: [channelID, payload(s)..., channelName, pair]
    let pair = last.map(str::to_owned);
    let channel_name = second_last.unwrap_or_default();
    let pair = match pair {
        Some(p) => p,
        None => return Ok(InboundEvent::Unknown(raw.clone())),
    };

    if channel_name.starts_with("book") {
        return decode_book(arr, pair);
    }
    if channel_name == "trade" {
        return decode_trade(arr, pair);
    }
    if channel_name.starts_with("ohlc") {
        return decode_ohlc(arr, pair);
    }
    if channel_name == "spread" {
        return decode_spread(arr, pair);
    }
    if channel_name == "ticker" {
        return decode_ticker(arr, pair);
    }
    Ok(InboundEvent::Unknown(raw.clone()))
}

fn decode_ohlc(arr: &[Value], pair: String) -> Result<InboundEvent> {
    let fields = arr[1].as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "ohlc payload is not an array".into(),
        raw: arr[1].clone(),
    })?;
    if fields.len() < 9 {
        return Err(KrakenError::MalformedFrame {
            reason: "ohlc candle shorter than 9 fields".into(),
            raw: arr[1].clone(),
        });
    }
    let candle = Candle {
        time: decode_timestamp(&fields[0])?,
        etime: decode_timestamp(&fields[1])?,
        open: decode_decimal(&fields[2])?,
        high: decode_decimal(&fields[3])?,
        low: decode_decimal(&fields[4])?,
        close: decode_decimal(&fields[5])?,
        vwap: decode_decimal(&fields[6])?,
        volume: decode_decimal(&fields[7])?,
        count: fields[8].as_u64().unwrap_or_default(),
    };
    Ok(InboundEvent::Ohlc { pair, candle })
}

fn decode_spread(arr: &[Value], pair: String) -> Result<InboundEvent> {
    let fields = arr[1].as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "spread payload is not an array".into(),
        raw: arr[1].clone(),
    })?;
    if fields.len() < 5 {
        return Err(KrakenError::MalformedFrame {
            reason: "spread tuple shorter than 5 fields".into(),
            raw: arr[1].clone(),
        });
    }
    let spread = SpreadQuote {
        bid: decode_decimal(&fields[0])?,
        ask: decode_decimal(&fields[1])?,
        timestamp: decode_timestamp(&fields[2])?,
        bid_volume: decode_decimal(&fields[3])?,
        ask_volume: decode_decimal(&fields[4])?,
    };
    Ok(InboundEvent::Spread { pair, spread })
}

fn decode_ticker(arr: &[Value], pair: String) -> Result<InboundEvent> {
    let obj = arr[1].as_object().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "ticker payload is not an object".into(),
        raw: arr[1].clone(),
    })?;
    let pair2 = |key: &str, idx: usize| -> Result<Decimal> {
        let arr = obj
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| KrakenError::MalformedFrame {
                reason: format!("ticker field {key} missing or not an array"),
                raw: Value::Object(obj.clone()),
            })?;
        let v = arr.get(idx).ok_or_else(|| KrakenError::MalformedFrame {
            reason: format!("ticker field {key} shorter than expected"),
            raw: Value::Object(obj.clone()),
        })?;
        decode_decimal(v)
    };
    let count = |key: &str, idx: usize| -> u64 {
        obj.get(key)
            .and_then(Value::as_array)
            .and_then(|a| a.get(idx))
            .and_then(Value::as_u64)
            .unwrap_or_default()
    };
    let ticker = TickerSnapshot {
        ask_price: pair2("a", 0)?,
        ask_whole_lot_volume: pair2("a", 1)?,
        ask_lot_volume: pair2("a", 2)?,
        bid_price: pair2("b", 0)?,
        bid_whole_lot_volume: pair2("b", 1)?,
        bid_lot_volume: pair2("b", 2)?,
        close_price: pair2("c", 0)?,
        close_lot_volume: pair2("c", 1)?,
        volume_today: pair2("v", 0)?,
        volume_last_24h: pair2("v", 1)?,
        vwap_today: pair2("p", 0)?,
        vwap_last_24h: pair2("p", 1)?,
        trades_today: count("t", 0),
        trades_last_24h: count("t", 1),
        low_today: pair2("l", 0)?,
        low_last_24h: pair2("l", 1)?,
        high_today: pair2("h", 0)?,
        high_last_24h: pair2("h", 1)?,
        open_today: pair2("o", 0)?,
        open_last_24h: pair2("o", 1)?,
    };
    Ok(InboundEvent::Ticker {
        pair,
        ticker: Box::new(ticker),
    })
}

fn decode_book(arr: &[Value], pair: String) -> Result<InboundEvent> {
    // Snapshot: [channelID, {as, bs}, "book-N", pair]
    // Update (one side): [channelID, {a|b, c}, "book-N", pair]
    // Update (both sides, combined): [channelID, {a,c}, {b,c}, "book-N", pair]
    let mut bids = Vec::new();
    let mut asks = Vec::new();
    let mut checksum = None;
    let mut is_snapshot = false;

    for payload in &arr[1..arr.len() - 2] {
        let Some(obj) = payload.as_object() else {
            continue;
        };
        if let Some(levels) = obj.get("bs") {
            is_snapshot = true;
            bids.extend(decode_levels(levels)?);
        }
        if let Some(levels) = obj.get("as") {
            is_snapshot = true;
            asks.extend(decode_levels(levels)?);
        }
        if let Some(levels) = obj.get("b") {
            bids.extend(decode_levels(levels)?);
        }
        if let Some(levels) = obj.get("a") {
            asks.extend(decode_levels(levels)?);
        }
        if let Some(c) = obj.get("c").and_then(Value::as_str) {
            checksum = Some(c.to_owned());
        }
    }

    let payload = if is_snapshot {
        BookPayload::Snapshot { bids, asks }
    } else {
        BookPayload::Update {
            bids,
            asks,
            checksum,
        }
    };
    Ok(InboundEvent::Book { pair, payload })
}

fn decode_levels(value: &Value) -> Result<Vec<BookLevel>> {
    let arr = value.as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "expected an array of [price, volume, timestamp] levels".into(),
        raw: value.clone(),
    })?;
    arr.iter().map(decode_one_level).collect()
}

fn decode_one_level(value: &Value) -> Result<BookLevel> {
    let arr = value.as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "expected [price, volume, timestamp]".into(),
        raw: value.clone(),
    })?;
    if arr.len() < 3 {
        return Err(KrakenError::MalformedFrame {
            reason: "level tuple shorter than 3 elements".into(),
            raw: value.clone(),
        });
    }
    let price = decode_decimal(&arr[0])?;
    let volume = decode_decimal(&arr[1])?;
    let timestamp = decode_timestamp(&arr[2])?;
    Ok(BookLevel {
        price,
        volume,
        timestamp,
    })
}

fn decode_trade(arr: &[Value], pair: String) -> Result<InboundEvent> {
    let entries = arr[1].as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "trade payload is not an array".into(),
        raw: arr[1].clone(),
    })?;
    let mut trades = Vec::with_capacity(entries.len());
    for entry in entries {
        let fields = entry.as_array().ok_or_else(|| KrakenError::MalformedFrame {
            reason: "trade entry is not an array".into(),
            raw: entry.clone(),
        })?;
        if fields.len() < 6 {
            return Err(KrakenError::MalformedFrame {
                reason: "trade entry shorter than 6 fields".into(),
                raw: entry.clone(),
            });
        }
        let side = match fields[3].as_str() {
            Some("b") => crate::types::Side::Buy,
            Some("s") => crate::types::Side::Sell,
            _ => {
                return Err(KrakenError::MalformedFrame {
                    reason: "unknown trade side code".into(),
                    raw: entry.clone(),
                });
            }
        };
        let order_type = match fields[4].as_str() {
            Some("m") => crate::types::OrderType::Market,
            Some("l") => crate::types::OrderType::Limit,
            _ => {
                return Err(KrakenError::MalformedFrame {
                    reason: "unknown trade order type code".into(),
                    raw: entry.clone(),
                });
            }
        };
        trades.push(PublicTrade {
            price: decode_decimal(&fields[0])?,
            volume: decode_decimal(&fields[1])?,
            time: decode_timestamp(&fields[2])?,
            side,
            order_type,
        });
    }
    Ok(InboundEvent::Trade { pair, trades })
}

fn decode_own_trades(value: &Value) -> Result<Vec<(String, Trade)>> {
    let entries = value.as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "ownTrades payload is not an array".into(),
        raw: value.clone(),
    })?;
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let obj = entry.as_object().ok_or_else(|| KrakenError::MalformedFrame {
            reason: "ownTrades entry is not an object".into(),
            raw: entry.clone(),
        })?;
        for (trade_id, detail) in obj {
            let d = detail.as_object().ok_or_else(|| KrakenError::MalformedFrame {
                reason: "ownTrades detail is not an object".into(),
                raw: detail.clone(),
            })?;
            let side = match d.get("type").and_then(Value::as_str) {
                Some("buy") => crate::types::Side::Buy,
                Some("sell") => crate::types::Side::Sell,
                _ => crate::types::Side::Buy,
            };
            let order_type = match d.get("ordertype").and_then(Value::as_str) {
                Some("market") => crate::types::OrderType::Market,
                _ => crate::types::OrderType::Limit,
            };
            let trade = Trade {
                symbol: d
                    .get("pair")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
                side,
                order_type,
                price: d
                    .get("price")
                    .map(decode_decimal)
                    .transpose()?
                    .unwrap_or_default(),
                volume: d
                    .get("vol")
                    .map(decode_decimal)
                    .transpose()?
                    .unwrap_or_default(),
                time: d
                    .get("time")
                    .map(decode_timestamp)
                    .transpose()?
                    .unwrap_or_else(chrono::Utc::now),
                order_id: d
                    .get("ordertxid")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
            };
            out.push((trade_id.clone(), trade));
        }
    }
    Ok(out)
}

fn decode_open_orders(value: &Value) -> Result<Vec<OpenOrderUpdate>> {
    let entries = value.as_array().ok_or_else(|| KrakenError::MalformedFrame {
        reason: "openOrders payload is not an array".into(),
        raw: value.clone(),
    })?;
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let obj = entry.as_object().ok_or_else(|| KrakenError::MalformedFrame {
            reason: "openOrders entry is not an object".into(),
            raw: entry.clone(),
        })?;
        for (order_id, detail) in obj {
            let d = detail.as_object().ok_or_else(|| KrakenError::MalformedFrame {
                reason: "openOrders detail is not an object".into(),
                raw: detail.clone(),
            })?;
            out.push(OpenOrderUpdate {
                order_id: order_id.clone(),
                status: d
                    .get("status")
                    .and_then(|v| serde_json::from_value(v.clone()).ok()),
                cum_qty: d.get("vol_exec").map(decode_decimal).transpose()?,
                avg_price: d.get("avg_price").map(decode_decimal).transpose()?,
                userref: d.get("userref").and_then(Value::as_u64),
                reason: d
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            });
        }
    }
    Ok(out)
}

fn decode_decimal(value: &Value) -> Result<Decimal> {
    let s = match value {
        Value::String(s) => s.as_str(),
        Value::Number(n) => return Ok(Decimal::from_str_exact(&n.to_string()).unwrap_or_default()),
        _ => {
            return Err(KrakenError::MalformedFrame {
                reason: "expected a decimal string or number".into(),
                raw: value.clone(),
            });
        }
    };
    Decimal::from_str_exact(s).map_err(|e| KrakenError::MalformedFrame {
        reason: format!("not a valid decimal: {e}"),
        raw: value.clone(),
    })
}

fn decode_timestamp(value: &Value) -> Result<chrono::DateTime<chrono::Utc>> {
    let secs: f64 = match value {
        Value::String(s) => s.parse().map_err(|_| KrakenError::MalformedFrame {
            reason: "timestamp string is not a number".into(),
            raw: value.clone(),
        })?,
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        _ => {
            return Err(KrakenError::MalformedFrame {
                reason: "expected a unix-seconds timestamp".into(),
                raw: value.clone(),
            });
        }
    };
    let nanos = (secs.fract() * 1e9).round() as u32;
    chrono::DateTime::from_timestamp(secs.trunc() as i64, nanos).ok_or_else(|| {
        KrakenError::MalformedFrame {
            reason: "timestamp out of range".into(),
            raw: value.clone(),
        }
    })
}

// ---------------------------------------------------------------------------
// Outbound command builders
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Subscription<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

/// Build a `subscribe` envelope for one or more pairs.
pub fn encode_subscribe(
    reqid: u64,
    pairs: &[&str],
    channel: &str,
    depth: Option<u32>,
    interval: Option<u32>,
    token: Option<&str>,
) -> String {
    serde_json::json!({
        "event": "subscribe",
        "reqid": reqid,
        "pair": pairs,
        "subscription": Subscription { name: channel, depth, interval, token },
    })
    .to_string()
}

/// Build an `unsubscribe` envelope.
pub fn encode_unsubscribe(reqid: u64, pairs: &[&str], channel: &str, token: Option<&str>) -> String {
    serde_json::json!({
        "event": "unsubscribe",
        "reqid": reqid,
        "pair": pairs,
        "subscription": Subscription { name: channel, depth: None, interval: None, token },
    })
    .to_string()
}

/// Build an `addOrder` envelope.
#[allow(clippy::too_many_arguments)]
pub fn encode_add_order(
    reqid: u64,
    token: &str,
    pair: &str,
    side: crate::types::Side,
    order_type: crate::types::OrderType,
    volume: Decimal,
    price: Option<Decimal>,
    time_in_force: crate::types::TimeInForce,
) -> String {
    let ordertype = serde_json::to_value(order_type).unwrap_or_default();
    let ordertype = ordertype.as_str().unwrap_or("limit").to_owned();
    let type_ = serde_json::to_value(side).unwrap_or_default();
    let type_ = type_.as_str().unwrap_or("buy").to_owned();
    serde_json::json!({
        "event": "addOrder",
        "reqid": reqid,
        "token": token,
        "pair": pair,
        "type": type_,
        "ordertype": ordertype,
        "volume": volume.to_string(),
        "price": price.map(|p| p.to_string()),
        "timeinforce": serde_json::to_value(time_in_force).unwrap_or_default(),
    })
    .to_string()
}

/// Build an `editOrder` envelope.
pub fn encode_edit_order(
    reqid: u64,
    token: &str,
    pair: &str,
    orig_tx_id: &str,
    volume: Decimal,
    price: Option<Decimal>,
) -> String {
    serde_json::json!({
        "event": "editOrder",
        "reqid": reqid,
        "token": token,
        "pair": pair,
        "orderid": orig_tx_id,
        "volume": volume.to_string(),
        "price": price.map(|p| p.to_string()),
    })
    .to_string()
}

/// Build a `cancelOrder` envelope.
pub fn encode_cancel_order(reqid: u64, token: &str, tx_ids: &[&str]) -> String {
    serde_json::json!({
        "event": "cancelOrder",
        "reqid": reqid,
        "token": token,
        "txid": tx_ids,
    })
    .to_string()
}

/// Build a `cancelAll` envelope.
pub fn encode_cancel_all(reqid: u64, token: &str) -> String {
    serde_json::json!({
        "event": "cancelAll",
        "reqid": reqid,
        "token": token,
    })
    .to_string()
}

/// Build a `cancelAllOrdersAfter` envelope.
pub fn encode_cancel_all_after(reqid: u64, token: &str, timeout_secs: u64) -> String {
    serde_json::json!({
        "event": "cancelAllOrdersAfter",
        "reqid": reqid,
        "token": token,
        "timeout": timeout_secs,
    })
    .to_string()
}

/// Build a `ping` envelope.
pub fn encode_ping(reqid: u64) -> String {
    serde_json::json!({
        "event": "ping",
        "reqid": reqid,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decodes_system_status() {
        let text = r#"{"connectionID":123,"event":"systemStatus","status":"online","version":"1.9.0"}"#;
        match decode(text).unwrap() {
            InboundEvent::SystemStatus {
                connection_id,
                status,
                version,
            } => {
                assert_eq!(connection_id, Some(123));
                assert_eq!(status, SystemStatusValue::Online);
                assert_eq!(version.as_deref(), Some("1.9.0"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decodes_book_snapshot() {
        let text = r#"[0,{"as":[["5541.30000","2.50700000","1534614248.123678"]],"bs":[["5541.20000","1.52900000","1534614248.765567"]]},"book-10","XBT/USD"]"#;
        match decode(text).unwrap() {
            InboundEvent::Book { pair, payload } => {
                assert_eq!(pair, "XBT/USD");
                match payload {
                    BookPayload::Snapshot { bids, asks } => {
                        assert_eq!(bids.len(), 1);
                        assert_eq!(asks.len(), 1);
                        assert_eq!(asks[0].price, dec!(5541.30000));
                    }
                    other => panic!("expected snapshot, got {other:?}"),
                }
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decodes_book_update_with_checksum() {
        let text = r#"[1234,{"a":[["5541.30000","0.00000000","1534614248.123678"]],"c":"974942666"},"book-10","XBT/USD"]"#;
        match decode(text).unwrap() {
            InboundEvent::Book { payload, .. } => match payload {
                BookPayload::Update { asks, checksum, .. } => {
                    assert_eq!(asks.len(), 1);
                    assert_eq!(asks[0].volume, dec!(0));
                    assert_eq!(checksum.as_deref(), Some("974942666"));
                }
                other => panic!("expected update, got {other:?}"),
            },
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decode_is_lenient_on_unrecognized_shapes() {
        let text = r#"{"event":"somethingNewFromTheExchange","foo":"bar"}"#;
        assert!(matches!(decode(text).unwrap(), InboundEvent::Unknown(_)));
    }

    #[test]
    fn decodes_ohlc_candle() {
        let text = r#"[42,["1542057314.748456","1542057360.435743","3586.70000","3586.70000","3586.60000","3586.60000","3586.68894","0.03373000",2],"ohlc-5","XBT/USD"]"#;
        match decode(text).unwrap() {
            InboundEvent::Ohlc { pair, candle } => {
                assert_eq!(pair, "XBT/USD");
                assert_eq!(candle.open, dec!(3586.70000));
                assert_eq!(candle.count, 2);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decodes_spread() {
        let text = r#"[0,["5698.40000","5700.00000","1542057299.545897","1.01234567","0.98765432"],"spread","XBT/USD"]"#;
        match decode(text).unwrap() {
            InboundEvent::Spread { pair, spread } => {
                assert_eq!(pair, "XBT/USD");
                assert_eq!(spread.bid, dec!(5698.40000));
                assert_eq!(spread.ask, dec!(5700.00000));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decodes_ticker() {
        let text = r#"[0,{"a":["5525.40000",1,"1.000"],"b":["5525.10000",1,"1.000"],"c":["5525.10000","0.00398963"],"v":["2634.11501494","3591.17907851"],"p":["5631.44067","5651.68430"],"t":[11493,16267],"l":["5505.00000","5505.00000"],"h":["5783.00000","5783.00000"],"o":["5760.70000","5763.40000"]},"ticker","XBT/USD"]"#;
        match decode(text).unwrap() {
            InboundEvent::Ticker { pair, ticker } => {
                assert_eq!(pair, "XBT/USD");
                assert_eq!(ticker.ask_price, dec!(5525.40000));
                assert_eq!(ticker.trades_today, 11493);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn encode_add_order_round_trips_through_decode_friendly_shape() {
        let frame = encode_add_order(
            10_000_000_001,
            "abc-token",
            "XBT/USD",
            crate::types::Side::Buy,
            crate::types::OrderType::Limit,
            dec!(1.5),
            Some(dec!(30000.1)),
            crate::types::TimeInForce::GoodTillCancel,
        );
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "addOrder");
        assert_eq!(value["ordertype"], "limit");
        assert_eq!(value["type"], "buy");
        assert_eq!(value["volume"], "1.5");
    }
}
