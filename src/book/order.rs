//! Order and side types shared across the book.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price::Price;

/// Which side of the book an order or message belongs to.
///
/// The exchange's wire format spells these `"buy"`/`"sell"` (spec §6); the
/// book's own vocabulary is bid/ask, so the (de)serialization renames at
/// the boundary rather than carrying the wire spelling inward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A resting buy order.
    #[serde(rename = "buy")]
    Bid,
    /// A resting sell order.
    #[serde(rename = "sell")]
    Ask,
}

impl Side {
    /// The opposite side.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// A single resting order at a price level.
///
/// `size` is the order's remaining quantity; it is mutated in place by
/// `match` and `change` and is always strictly positive while the order is
/// present in a [`crate::book::level::PriceLevel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Exchange-assigned, opaque order id, unique across the session.
    pub id: String,
    /// Price level this order rests at.
    pub price: Price,
    /// Remaining size.
    pub size: Decimal,
    /// Which side this order rests on.
    pub side: Side,
}

impl Order {
    /// Creates a new resting order.
    pub fn new(id: impl Into<String>, price: Price, size: Decimal, side: Side) -> Self {
        Order {
            id: id.into(),
            price,
            size,
            side,
        }
    }
}
