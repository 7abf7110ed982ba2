//! A single price/volume level, as carried by order book and ticker frames.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One price level: a price, the volume resting at it, and the timestamp the
/// exchange attached to the update that produced it.
///
/// `price` and `volume` are [`Decimal`] rather than `f64` so that the wire's
/// decimal-string literals round-trip without precision loss — Kraken's own
/// feed carries up to 10 significant digits of price and 8 of volume, well
/// within `Decimal`'s exact range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: Decimal,
    pub volume: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    pub fn new(price: Decimal, volume: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            volume,
            timestamp,
        }
    }
}
