//! Wire types for the REST snapshot and order endpoints (spec §6).

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::book::Side;
use crate::price::Price;

/// One `[price, size, order_id]` entry in a level-3 snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotEntry {
    /// Price, as a decimal string from the exchange.
    pub price: Price,
    /// Resting size.
    pub size: Decimal,
    /// Opaque order id.
    pub order_id: String,
}

/// `GET /products/BTC-USD/book?level=3` response (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Sequence number the snapshot was captured at.
    pub sequence: u64,
    /// Resting bids, in no particular order (the book sorts them).
    pub bids: Vec<SnapshotEntry>,
    /// Resting asks, in no particular order.
    pub asks: Vec<SnapshotEntry>,
}

/// An order returned by `GET /orders` (spec §9 supplemented feature,
/// `OpenOrders::get_open_orders` in `original_source/main.py`).
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrderEntry {
    /// Exchange-assigned order id.
    pub id: String,
    /// Which side this order rests on.
    pub side: Side,
    /// Resting price.
    pub price: Price,
}

/// The body of a `POST /orders` request (spec §6).
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewOrder {
    /// Order size.
    pub size: Decimal,
    /// Limit price.
    pub price: Price,
    /// Buy or sell.
    pub side: Side,
    /// Always `"BTC-USD"` for this system.
    pub product_id: &'static str,
    /// Always `true`: the quote manager only ever posts post-only orders.
    pub post_only: bool,
}

/// The exchange's response to a `POST /orders` call. The exchange returns
/// one of several incompatible shapes depending on outcome; this enum
/// covers every response the quote manager must distinguish (spec §4.4,
/// §7).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrderResponse {
    /// Order accepted or rejected by the matching engine.
    Status {
        /// The new order's id, present when `status == "pending"`.
        #[serde(default)]
        id: Option<String>,
        /// `"pending"` or `"rejected"`.
        status: String,
    },
    /// A soft or hard failure reported via a `message` field, e.g.
    /// `"Insufficient funds"`.
    Message {
        /// Human-readable failure description.
        message: String,
    },
}

/// The exchange's response to a `DELETE /orders/{id}` call. HTTP 200 with
/// an empty/irrelevant body is success; anything else carries a `message`
/// (spec §4.4 cancellation response handling).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CancelResponse {
    /// Present when the cancellation raced a fill or another cancel.
    #[serde(default)]
    pub message: Option<String>,
}
