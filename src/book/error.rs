//! Order book error types.

use crate::price::Price;

/// Errors that can occur within a [`crate::book::book::OrderBook`] or one of
/// its [`crate::book::tree::PriceTree`]s.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BookError {
    /// An operation referenced an order id that is not resting anywhere in
    /// the book (spec §4.1: `match`/`change`/`remove_order` on an absent
    /// order "fails loudly").
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// `max_key`/`min_key` was called on a side with no resting orders.
    #[error("price tree is empty")]
    EmptySide,

    /// The book observed `asks.min_key() <= bids.max_key()` (spec I3).
    #[error("crossed book: max bid {max_bid} >= min ask {min_ask}")]
    CrossedBook {
        /// The observed best bid.
        max_bid: Price,
        /// The observed best ask.
        min_ask: Price,
    },
}
