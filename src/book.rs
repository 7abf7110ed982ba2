//! Order Book (L2) — a depth-capped, snapshot-and-delta-reconciled view of
//! one symbol's resting bids and asks.

use rust_decimal::Decimal;

use crate::error::{KrakenError, Result};
use crate::types::Quote;
use crate::ws::codec::{BookLevel, BookPayload};

/// One symbol's L2 order book.
///
/// Bids are kept sorted descending by price (best bid first), asks
/// ascending (best ask first). Both sides are truncated to `depth` after
/// every mutation.
#[derive(Debug, Clone)]
pub struct OrderBook {
    depth: usize,
    bids: Vec<Quote>,
    asks: Vec<Quote>,
}

impl OrderBook {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            bids: Vec::with_capacity(depth),
            asks: Vec::with_capacity(depth),
        }
    }

    /// Replace the book wholesale from a snapshot payload.
    pub fn from_snapshot(depth: usize, bids: &[BookLevel], asks: &[BookLevel]) -> Self {
        let mut book = Self::new(depth);
        book.bids = bids.iter().map(level_to_quote).collect();
        book.asks = asks.iter().map(level_to_quote).collect();
        book.sort_and_truncate();
        book
    }

    /// Reconcile an incremental delta into the book in place.
    ///
    /// For each side in the payload: a level with zero volume is removed,
    /// a level matching an existing price is overwritten, and any other
    /// level is inserted and the side re-sorted and truncated to `depth`.
    pub fn apply_delta(&mut self, bids: &[BookLevel], asks: &[BookLevel]) {
        for level in bids {
            Self::apply_side(&mut self.bids, level);
        }
        for level in asks {
            Self::apply_side(&mut self.asks, level);
        }
        self.sort_and_truncate();
    }

    fn apply_side(side: &mut Vec<Quote>, level: &BookLevel) {
        if let Some(pos) = side.iter().position(|q| q.price == level.price) {
            if level.volume.is_zero() {
                side.remove(pos);
            } else {
                side[pos] = level_to_quote(level);
            }
        } else if !level.volume.is_zero() {
            side.push(level_to_quote(level));
        }
    }

    fn sort_and_truncate(&mut self) {
        self.bids.sort_by(|a, b| b.price.cmp(&a.price));
        self.asks.sort_by(|a, b| a.price.cmp(&b.price));
        self.bids.truncate(self.depth);
        self.asks.truncate(self.depth);
    }

    /// The best (highest) bid.
    pub fn best_bid(&self) -> Result<Quote> {
        self.bids.first().copied().ok_or(KrakenError::EmptySide)
    }

    /// The best (lowest) ask.
    pub fn best_ask(&self) -> Result<Quote> {
        self.asks.first().copied().ok_or(KrakenError::EmptySide)
    }

    /// `true` if the best bid is strictly above the best ask — a state
    /// that should never persist and indicates either a missed delta or a
    /// checksum mismatch upstream. A locked book (bid == ask) is not
    /// crossed.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Ok(bid), Ok(ask)) => bid.price > ask.price,
            _ => false,
        }
    }

    pub fn bids(&self) -> &[Quote] {
        &self.bids
    }

    pub fn asks(&self) -> &[Quote] {
        &self.asks
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

fn level_to_quote(level: &BookLevel) -> Quote {
    Quote::new(level.price, level.volume, level.timestamp)
}

/// Apply a decoded [`BookPayload`] to a book, constructing it from a
/// snapshot if this is the first payload seen for the symbol.
pub fn apply_payload(book: &mut Option<OrderBook>, depth: usize, payload: &BookPayload) {
    match payload {
        BookPayload::Snapshot { bids, asks } => {
            *book = Some(OrderBook::from_snapshot(depth, bids, asks));
        }
        BookPayload::Update { bids, asks, .. } => {
            let book = book.get_or_insert_with(|| OrderBook::new(depth));
            book.apply_delta(bids, asks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn level(price: Decimal, volume: Decimal) -> BookLevel {
        BookLevel {
            price,
            volume,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn snapshot_sorts_each_side() {
        let bids = vec![level(dec!(10), dec!(1)), level(dec!(12), dec!(1))];
        let asks = vec![level(dec!(15), dec!(1)), level(dec!(13), dec!(1))];
        let book = OrderBook::from_snapshot(10, &bids, &asks);
        assert_eq!(book.best_bid().unwrap().price, dec!(12));
        assert_eq!(book.best_ask().unwrap().price, dec!(13));
    }

    #[test]
    fn delta_removes_zero_volume_level() {
        let mut book = OrderBook::from_snapshot(
            10,
            &[level(dec!(10), dec!(1))],
            &[level(dec!(11), dec!(1))],
        );
        book.apply_delta(&[level(dec!(10), dec!(0))], &[]);
        assert!(book.best_bid().is_err());
    }

    #[test]
    fn delta_overwrites_matching_price() {
        let mut book = OrderBook::from_snapshot(10, &[level(dec!(10), dec!(1))], &[]);
        book.apply_delta(&[level(dec!(10), dec!(5))], &[]);
        assert_eq!(book.best_bid().unwrap().volume, dec!(5));
    }

    #[test]
    fn depth_cap_truncates_after_insert() {
        let mut book = OrderBook::new(2);
        book.apply_delta(
            &[
                level(dec!(10), dec!(1)),
                level(dec!(11), dec!(1)),
                level(dec!(9), dec!(1)),
            ],
            &[],
        );
        assert_eq!(book.bids().len(), 2);
        assert_eq!(book.best_bid().unwrap().price, dec!(11));
    }

    #[test]
    fn crossed_book_is_detected() {
        let book = OrderBook::from_snapshot(
            10,
            &[level(dec!(12), dec!(1))],
            &[level(dec!(11), dec!(1))],
        );
        assert!(book.is_crossed());
    }
}
