//! Trade Monitor — a bounded, most-recent-N window of own-trade fills,
//! with price-bucketed volume aggregation over an optional lookback.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::types::Trade;

/// Tracks the most recent fills for one symbol, evicting the oldest once
/// `capacity` is exceeded.
#[derive(Debug)]
pub struct TradeMonitor {
    capacity: usize,
    trades: VecDeque<Trade>,
}

impl TradeMonitor {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            trades: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a fill, evicting the oldest entry if the ring buffer is full.
    pub fn update(&mut self, trade: Trade) {
        if self.trades.len() >= self.capacity {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    /// Bucket recorded volume by `floor(price / tick_size)`, optionally
    /// restricted to trades at or after `since`.
    pub fn aggregate(&self, tick_size: Decimal, since: Option<DateTime<Utc>>) -> HashMap<i64, Decimal> {
        let mut buckets: HashMap<i64, Decimal> = HashMap::new();
        for trade in self
            .trades
            .iter()
            .filter(|t| since.is_none_or(|s| t.time >= s))
        {
            let bucket = (trade.price / tick_size).floor();
            let key = bucket.to_i64().unwrap_or_default();
            *buckets.entry(key).or_insert(Decimal::ZERO) += trade.volume;
        }
        buckets
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::enums::{OrderType, Side};
    use rust_decimal_macros::dec;

    fn trade(price: Decimal, volume: Decimal, time: DateTime<Utc>) -> Trade {
        Trade {
            symbol: "XBT/USD".into(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            price,
            volume,
            time,
            order_id: "OID-1".into(),
        }
    }

    #[test]
    fn evicts_oldest_once_over_capacity() {
        let mut monitor = TradeMonitor::new(2);
        monitor.update(trade(dec!(1), dec!(1), Utc::now()));
        monitor.update(trade(dec!(2), dec!(1), Utc::now()));
        monitor.update(trade(dec!(3), dec!(1), Utc::now()));
        assert_eq!(monitor.len(), 2);
        let agg = monitor.aggregate(dec!(1), None);
        assert!(!agg.contains_key(&1));
    }

    #[test]
    fn aggregates_by_tick_bucket() {
        let mut monitor = TradeMonitor::new(10);
        monitor.update(trade(dec!(100.2), dec!(1), Utc::now()));
        monitor.update(trade(dec!(100.4), dec!(2), Utc::now()));
        monitor.update(trade(dec!(101.1), dec!(3), Utc::now()));
        let agg = monitor.aggregate(dec!(1), None);
        assert_eq!(agg.get(&100), Some(&dec!(3)));
        assert_eq!(agg.get(&101), Some(&dec!(3)));
    }

    #[test]
    fn since_filters_out_older_trades() {
        let mut monitor = TradeMonitor::new(10);
        let old = Utc::now() - chrono::Duration::seconds(600);
        monitor.update(trade(dec!(100), dec!(1), old));
        monitor.update(trade(dec!(100), dec!(1), Utc::now()));
        let agg = monitor.aggregate(dec!(1), Some(Utc::now() - chrono::Duration::seconds(300)));
        assert_eq!(agg.get(&100), Some(&dec!(1)));
    }
}
