//! Resting-quote state tracked by the quote manager (spec §3 `OpenOrders`).

use rust_decimal::Decimal;

use crate::price::Price;

/// A single resting quote this system posted.
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    /// The exchange-assigned order id.
    pub order_id: String,
    /// The price it was posted at.
    pub price: Price,
}

/// Tracks at most one resting bid and one resting ask, plus the sticky
/// "insufficient funds" flags and rejection-bias accumulators spec §3/§4.4
/// describe.
#[derive(Debug, Clone, Default)]
pub struct OpenOrders {
    /// The single resting bid, if any.
    pub bid: Option<RestingOrder>,
    /// The single resting ask, if any.
    pub ask: Option<RestingOrder>,
    /// Set when a bid post was rejected with `"Insufficient funds"`;
    /// cleared when the bid side completes a `done` message.
    pub insufficient_usd: bool,
    /// Set when an ask post was rejected with `"Insufficient funds"`;
    /// cleared when the ask side completes a `done` message.
    pub insufficient_btc: bool,
    /// Cumulative price adjustment applied to the next bid quote,
    /// incremented by `0.04` on each post-only rejection (spec §4.4, §9).
    pub bid_rejection_bias: Decimal,
    /// Cumulative price adjustment applied to the next ask quote.
    pub ask_rejection_bias: Decimal,
}

impl OpenOrders {
    /// Seeds `bid`/`ask` from the account's currently-open orders,
    /// restoring them across a reconnect without immediately reposting a
    /// duplicate quote (spec §9 supplemented feature, originally
    /// `OpenOrders.get_open_orders` in `original_source/main.py`).
    pub fn seed_bid(&mut self, order_id: String, price: Price) {
        self.bid = Some(RestingOrder { order_id, price });
    }

    /// See [`Self::seed_bid`].
    pub fn seed_ask(&mut self, order_id: String, price: Price) {
        self.ask = Some(RestingOrder { order_id, price });
    }
}
