//! Price-level tree: a sorted map from price to [`PriceLevel`] (C1).
//!
//! Backed by [`crossbeam_skiplist::SkipMap`], the same concurrent ordered
//! map `orderbook-rs` keys its `bids`/`asks` trees with
//! (`orderbook-rs/src/orderbook/book.rs`). Each level is wrapped in
//! `Arc<Mutex<_>>` rather than mutated lock-free in place, since this book
//! is owned by a single cooperative task (spec §5) and gains nothing from
//! `orderbook-rs`'s lock-free level internals — the skip list itself is kept
//! for its ordered-key access (`max_key`/`min_key` in O(log P)).

use std::sync::{Arc, Mutex};

use crossbeam_skiplist::SkipMap;
use rust_decimal::Decimal;

use super::error::BookError;
use super::level::PriceLevel;
use super::order::{Order, Side};
use crate::price::Price;

/// One side (bid or ask) of an order book.
pub struct PriceTree {
    side: Side,
    levels: SkipMap<i64, Arc<Mutex<PriceLevel>>>,
}

impl PriceTree {
    /// Creates an empty tree for `side`.
    pub fn new(side: Side) -> Self {
        PriceTree {
            side,
            levels: SkipMap::new(),
        }
    }

    /// Appends an order to the tail of the level at `price`, creating the
    /// level if absent. `initial` is accepted only as a hook for
    /// snapshot-load bookkeeping/validation (spec §4.1); it does not change
    /// behavior here.
    pub fn insert_order(&self, id: String, size: Decimal, price: Price, _initial: bool) {
        let entry = self
            .levels
            .get_or_insert_with(price.cents(), || Arc::new(Mutex::new(PriceLevel::new(price))));
        entry
            .value()
            .lock()
            .expect("price level mutex poisoned")
            .insert_order(id, size, self.side);
    }

    /// No-op on book state; acknowledged for sequence bookkeeping only
    /// (spec §4.1/§9).
    pub fn receive(&self, _id: &str, _size: Decimal) {}

    /// Subtracts `size` from `maker_id`'s remaining size at `price`.
    pub fn match_order(&self, price: Price, maker_id: &str, size: Decimal) -> Result<(), BookError> {
        let entry = self
            .levels
            .get(&price.cents())
            .ok_or_else(|| BookError::OrderNotFound(maker_id.to_string()))?;
        entry
            .value()
            .lock()
            .expect("price level mutex poisoned")
            .apply_match(maker_id, size)
    }

    /// Replaces an order's size in place.
    pub fn change(&self, price: Price, id: &str, new_size: Decimal) -> Result<(), BookError> {
        let entry = self
            .levels
            .get(&price.cents())
            .ok_or_else(|| BookError::OrderNotFound(id.to_string()))?;
        entry
            .value()
            .lock()
            .expect("price level mutex poisoned")
            .change(id, new_size)
    }

    /// Removes an order, deleting its level if it becomes empty.
    pub fn remove_order(&self, price: Price, id: &str) -> Result<Order, BookError> {
        let entry = self
            .levels
            .get(&price.cents())
            .ok_or_else(|| BookError::OrderNotFound(id.to_string()))?;
        let (removed, now_empty) = {
            let mut level = entry.value().lock().expect("price level mutex poisoned");
            let removed = level.remove_order(id)?;
            (removed, level.is_empty())
        };
        if now_empty {
            entry.remove();
        }
        Ok(removed)
    }

    /// The extremal price in this tree: the max key for bids, the min key
    /// for asks is handled by the caller choosing which method to call —
    /// this simply exposes both so `book::book::OrderBook` can pick the
    /// correct one for each side.
    pub fn max_key(&self) -> Result<Price, BookError> {
        self.levels
            .back()
            .map(|e| Price::from_cents(*e.key()))
            .ok_or(BookError::EmptySide)
    }

    /// See [`Self::max_key`].
    pub fn min_key(&self) -> Result<Price, BookError> {
        self.levels
            .front()
            .map(|e| Price::from_cents(*e.key()))
            .ok_or(BookError::EmptySide)
    }

    /// Whether this side currently holds any resting orders.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct price levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Looks up the price an order id is at within this tree, scanning
    /// levels. Prefer `book::book::OrderBook`'s id-to-price index for O(1)
    /// lookup; this exists for tests and debugging.
    #[cfg(test)]
    pub fn find_order(&self, id: &str) -> Option<Order> {
        for entry in self.levels.iter() {
            let level = entry.value().lock().expect("price level mutex poisoned");
            if let Some(order) = level.iter().find(|o| o.id == id) {
                return Some(order.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn max_key_is_highest_price() {
        let tree = PriceTree::new(Side::Bid);
        tree.insert_order("A".into(), Decimal::new(1, 0), px("100.00"), false);
        tree.insert_order("B".into(), Decimal::new(1, 0), px("101.50"), false);
        assert_eq!(tree.max_key().unwrap(), px("101.50"));
    }

    #[test]
    fn min_key_is_lowest_price() {
        let tree = PriceTree::new(Side::Ask);
        tree.insert_order("A".into(), Decimal::new(1, 0), px("101.00"), false);
        tree.insert_order("B".into(), Decimal::new(1, 0), px("99.50"), false);
        assert_eq!(tree.min_key().unwrap(), px("99.50"));
    }

    #[test]
    fn empty_tree_keys_fail() {
        let tree = PriceTree::new(Side::Bid);
        assert!(matches!(tree.max_key(), Err(BookError::EmptySide)));
    }

    #[test]
    fn removing_last_order_deletes_level() {
        let tree = PriceTree::new(Side::Bid);
        tree.insert_order("A".into(), Decimal::new(1, 0), px("100.00"), false);
        assert_eq!(tree.level_count(), 1);
        tree.remove_order(px("100.00"), "A").unwrap();
        assert_eq!(tree.level_count(), 0);
    }
}
