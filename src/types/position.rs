//! Running per-symbol position, as accumulated by [`crate::position::PositionTracker`].

use rust_decimal::Decimal;

/// A running position in one symbol: signed quantity, weighted-average
/// entry price, and realized P&L accumulated as the position's magnitude
/// has been reduced.
#[derive(Debug, Clone)]
pub struct Position {
    pub symbol: String,
    /// Signed quantity: positive is long, negative is short, zero is flat.
    pub qty: Decimal,
    /// Weighted-average entry price of the current open quantity.
    /// `None` exactly when `qty` is zero.
    pub avg_price: Option<Decimal>,
    /// P&L realized so far by fills that reduced the position's magnitude.
    pub realized_pnl: Decimal,
}

impl Position {
    pub fn flat(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            qty: Decimal::ZERO,
            avg_price: None,
            realized_pnl: Decimal::ZERO,
        }
    }
}
