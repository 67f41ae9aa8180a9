//! Order book: bid/ask trees plus sequence state and trade history (C2).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::error::BookError;
use super::order::{Order, Side};
use super::tree::PriceTree;
use crate::price::Price;

/// Maximum number of trade events retained in [`OrderBook::matches`].
pub const MATCH_HISTORY_CAPACITY: usize = 100;

/// A single trade event, pushed onto the match ring whenever a `match`
/// message is applied (spec §3 `matches`).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Time the match occurred, as reported by the feed.
    pub time: DateTime<Utc>,
    /// The taker's side, per the feed message's `side` field.
    pub taker_side: Side,
    /// Traded size.
    pub size: Decimal,
    /// Traded price.
    pub price: Price,
}

/// The order book for a single product: two [`PriceTree`]s, a bounded
/// match history, and the sequence bookkeeping the feed synchronizer
/// relies on (spec §3).
pub struct OrderBook {
    bids: PriceTree,
    asks: PriceTree,
    /// order id -> (price, side), for O(1) location lookup given only an id.
    locations: DashMap<String, (Price, Side)>,
    matches: VecDeque<MatchRecord>,
    /// Sequence number returned with the REST snapshot.
    pub snapshot_sequence: u64,
    /// Sequence number of the first message applied after the snapshot.
    pub first_live_sequence: Option<u64>,
    /// Sequence number of the most recently applied message.
    pub last_applied_sequence: u64,
    /// Timestamp carried by the most recently applied message.
    pub last_event_time: Option<DateTime<Utc>>,
}

impl OrderBook {
    /// Creates an empty book. Sequence fields are populated once the
    /// snapshot loads (spec §4.3 Phase B).
    pub fn new() -> Self {
        OrderBook {
            bids: PriceTree::new(Side::Bid),
            asks: PriceTree::new(Side::Ask),
            locations: DashMap::new(),
            matches: VecDeque::with_capacity(MATCH_HISTORY_CAPACITY),
            snapshot_sequence: 0,
            first_live_sequence: None,
            last_applied_sequence: 0,
            last_event_time: None,
        }
    }

    fn tree(&self, side: Side) -> &PriceTree {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Inserts a new resting order (spec §4.1 `insert_order`, dispatched
    /// from an `open` message or a snapshot entry).
    pub fn insert_order(&self, id: String, size: Decimal, price: Price, side: Side, initial: bool) {
        self.tree(side).insert_order(id.clone(), size, price, initial);
        self.locations.insert(id, (price, side));
    }

    /// `received` messages never change depth (spec §4.1/§9).
    pub fn receive(&self, id: &str, size: Decimal) {
        if let Some(loc) = self.locations.get(id) {
            self.tree(loc.1).receive(id, size);
        }
    }

    /// Applies a `match` message: reduces the maker's resting size and
    /// pushes a [`MatchRecord`] onto the bounded history (spec §4.3 step 6,
    /// §3 `matches`).
    ///
    /// Per spec §4.3/§9, the message's `side` field names the *maker's*
    /// side; the taker's side (recorded in the history) is its opposite.
    pub fn apply_match(
        &mut self,
        maker_side: Side,
        maker_order_id: &str,
        size: Decimal,
        price: Price,
        time: DateTime<Utc>,
    ) -> Result<(), BookError> {
        self.tree(maker_side).match_order(price, maker_order_id, size)?;
        self.push_match(MatchRecord {
            time,
            taker_side: maker_side.opposite(),
            size,
            price,
        });
        Ok(())
    }

    fn push_match(&mut self, record: MatchRecord) {
        if self.matches.len() == MATCH_HISTORY_CAPACITY {
            self.matches.pop_back();
        }
        self.matches.push_front(record);
    }

    /// Updates an order's size in place (spec §4.1 `change`).
    pub fn change(&self, id: &str, new_size: Decimal) -> Result<(), BookError> {
        let (price, side) = *self
            .locations
            .get(id)
            .ok_or_else(|| BookError::OrderNotFound(id.to_string()))?;
        self.tree(side).change(price, id, new_size)
    }

    /// Removes an order from the book (spec §4.1 `remove_order`, dispatched
    /// from a `done` message).
    pub fn remove_order(&self, id: &str) -> Result<Order, BookError> {
        let (price, side) = self
            .locations
            .remove(id)
            .map(|(_, loc)| loc)
            .ok_or_else(|| BookError::OrderNotFound(id.to_string()))?;
        self.tree(side).remove_order(price, id)
    }

    /// The best (highest) resting bid price.
    pub fn max_bid(&self) -> Result<Price, BookError> {
        self.bids.max_key()
    }

    /// The best (lowest) resting ask price.
    pub fn min_ask(&self) -> Result<Price, BookError> {
        self.asks.min_key()
    }

    /// Whether the bid side has any resting orders.
    pub fn bids_is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    /// Whether the ask side has any resting orders.
    pub fn asks_is_empty(&self) -> bool {
        self.asks.is_empty()
    }

    /// Checks the crossed-book invariant (spec I3): when both sides are
    /// non-empty, the best bid must be strictly below the best ask.
    pub fn check_not_crossed(&self) -> Result<(), BookError> {
        if self.bids_is_empty() || self.asks_is_empty() {
            return Ok(());
        }
        let max_bid = self.max_bid()?;
        let min_ask = self.min_ask()?;
        if min_ask <= max_bid {
            return Err(BookError::CrossedBook { max_bid, min_ask });
        }
        Ok(())
    }

    /// The most recent matches, newest first, capped at
    /// [`MATCH_HISTORY_CAPACITY`].
    pub fn recent_matches(&self) -> impl Iterator<Item = &MatchRecord> {
        self.matches.iter()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
