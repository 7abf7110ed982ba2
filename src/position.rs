//! Position Tracker — accumulates own-trade fills into a running signed
//! quantity and weighted-average entry price per symbol.
//!
//! Kept as incrementally-updated running state rather than a fold over the
//! full fill history, so memory use does not grow with session length.
//! Unlike a plain running-average restatement, a fill that reduces the
//! position's magnitude (including one that crosses through flat) realizes
//! P&L against the prior average price instead of being blended into it.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::types::{Position, Side};

/// Tracks one [`Position`] per symbol.
#[derive(Debug, Default)]
pub struct PositionTracker {
    positions: HashMap<String, Position>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fill into the running position for `symbol`.
    pub fn add_fill(&mut self, symbol: &str, side: Side, qty: Decimal, price: Decimal) {
        let position = self
            .positions
            .entry(symbol.to_owned())
            .or_insert_with(|| Position::flat(symbol));

        let signed_qty = if side.is_sell() { -qty } else { qty };
        let same_direction =
            position.qty.is_zero() || position.qty.is_sign_positive() == signed_qty.is_sign_positive();

        if same_direction {
            let new_qty = position.qty + signed_qty;
            let prior_notional = position.avg_price.unwrap_or(Decimal::ZERO) * position.qty.abs();
            let added_notional = price * qty;
            position.avg_price = if new_qty.is_zero() {
                None
            } else {
                Some((prior_notional + added_notional) / new_qty.abs())
            };
            position.qty = new_qty;
        } else {
            // Fill works against the existing position: realize P&L on the
            // portion that offsets it, then let any excess open a position
            // in the new direction at the fill price.
            let avg = position.avg_price.unwrap_or(price);
            let closing_qty = qty.min(position.qty.abs());
            let pnl_per_unit = if position.qty.is_sign_positive() {
                price - avg
            } else {
                avg - price
            };
            position.realized_pnl += pnl_per_unit * closing_qty;

            let remaining_fill = qty - closing_qty;
            let new_qty = position.qty + signed_qty;
            if remaining_fill.is_zero() {
                position.qty = new_qty;
                if position.qty.is_zero() {
                    position.avg_price = None;
                }
            } else {
                // Position flipped sides: the excess opens a fresh position.
                position.qty = new_qty;
                position.avg_price = Some(price);
            }
        }
    }

    /// The current position for `symbol`, flat if no fills have been seen.
    pub fn get_position(&self, symbol: &str) -> Position {
        self.positions
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Position::flat(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn flat_position_has_no_avg_price() {
        let tracker = PositionTracker::new();
        let pos = tracker.get_position("XBT/USD");
        assert_eq!(pos.qty, dec!(0));
        assert_eq!(pos.avg_price, None);
    }

    #[test]
    fn buys_average_into_a_long_position() {
        let mut tracker = PositionTracker::new();
        tracker.add_fill("XBT/USD", Side::Buy, dec!(1), dec!(100));
        tracker.add_fill("XBT/USD", Side::Buy, dec!(1), dec!(200));
        let pos = tracker.get_position("XBT/USD");
        assert_eq!(pos.qty, dec!(2));
        assert_eq!(pos.avg_price, Some(dec!(150)));
    }

    #[test]
    fn sell_reduces_long_position_and_realizes_pnl() {
        let mut tracker = PositionTracker::new();
        tracker.add_fill("XBT/USD", Side::Buy, dec!(2), dec!(100));
        tracker.add_fill("XBT/USD", Side::Sell, dec!(1), dec!(150));
        let pos = tracker.get_position("XBT/USD");
        assert_eq!(pos.qty, dec!(1));
        assert_eq!(pos.avg_price, Some(dec!(100)));
        assert_eq!(pos.realized_pnl, dec!(50));
    }

    #[test]
    fn sell_through_flat_flips_to_short() {
        let mut tracker = PositionTracker::new();
        tracker.add_fill("XBT/USD", Side::Buy, dec!(1), dec!(100));
        tracker.add_fill("XBT/USD", Side::Sell, dec!(3), dec!(110));
        let pos = tracker.get_position("XBT/USD");
        assert_eq!(pos.qty, dec!(-2));
        assert_eq!(pos.avg_price, Some(dec!(110)));
        assert_eq!(pos.realized_pnl, dec!(10));
    }
}
