//! Feed message shape (spec §6) and the result of applying one to the book.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::book::Side;
use crate::price::Price;

/// A single inbound feed frame, deserialized directly from the websocket
/// text message. Fields not relevant to a given `type` are simply absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    /// Monotone per-feed sequence number.
    pub sequence: u64,
    /// `"received" | "open" | "match" | "done" | "change"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// RFC3339 event time.
    pub time: Option<DateTime<Utc>>,
    /// Which side the message concerns. For `match`, this names the
    /// *maker's* side (spec §4.3 step 6, §9).
    pub side: Option<Side>,
    /// The order id a `received`/`open`/`done`/`change` message refers to.
    pub order_id: Option<String>,
    /// The resting order a `match` message took liquidity from.
    pub maker_order_id: Option<String>,
    /// Traded size, present on `match`.
    pub size: Option<Decimal>,
    /// Size left resting, present on `open`.
    pub remaining_size: Option<Decimal>,
    /// Price, present on `open` and `match`.
    pub price: Option<Price>,
    /// New resting size, present on `change`.
    pub new_size: Option<Decimal>,
    /// `"filled" | "canceled"`, present on `done`.
    pub reason: Option<String>,
    /// `"limit" | "market"`, present when the feed tags order type.
    pub order_type: Option<String>,
}

/// What happened when a [`RawMessage`] was applied to the book (spec §4.3
/// step 6). The quote manager reacts only to [`AppliedEvent::Done`] and
/// the fact that *some* event was applied; the rest exist for logging and
/// tests (spec P1-P6 scenarios).
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedEvent {
    /// Message's sequence was `<= snapshot_sequence`; no book change.
    Discarded,
    /// `order_type == "market"`; counted for sequence purposes, not
    /// dispatched (spec §4.3 step 5, §9).
    MarketOrderSkipped,
    /// `received`; no depth change (spec §4.1/§9).
    Received {
        /// The order id the feed is acknowledging.
        order_id: String,
    },
    /// `open`; a new resting order was inserted.
    Opened {
        /// The new order's id.
        order_id: String,
        /// Which side it rests on.
        side: Side,
        /// Resting price.
        price: Price,
        /// Resting size.
        size: Decimal,
    },
    /// `match`; depth was reduced on the maker's side.
    Matched {
        /// The resting order that was hit.
        maker_order_id: String,
        /// The maker's side.
        maker_side: Side,
        /// Traded size.
        size: Decimal,
        /// Traded price.
        price: Price,
    },
    /// `done`; an order left the book.
    Done {
        /// The order id that was removed.
        order_id: String,
        /// Which side it had rested on.
        side: Side,
        /// `"filled"` or `"canceled"`, if present.
        reason: Option<String>,
    },
    /// `change`; an order's resting size was replaced.
    Changed {
        /// The order id whose size changed.
        order_id: String,
        /// The new resting size.
        new_size: Decimal,
    },
}
