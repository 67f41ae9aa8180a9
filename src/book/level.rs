//! Price-level order queue (C1).
//!
//! A [`PriceLevel`] holds every order resting at a single price, in time
//! priority. Internally it is an [`IndexMap`], which gives O(1) average
//! lookup and mutation by order id while preserving insertion order on
//! iteration — the same guarantee `orderbook-rs`'s `OrderQueue` gets from
//! pairing a `DashMap` with an id-only FIFO queue, collapsed into one
//! structure since this book is owned by a single task (spec §5) and needs
//! no concurrent-writer safety.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::error::BookError;
use super::order::{Order, Side};
use crate::price::Price;

/// All orders resting at one price, in time priority (oldest first).
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: IndexMap<String, Order>,
}

impl PriceLevel {
    /// Creates an empty level at `price`.
    pub fn new(price: Price) -> Self {
        PriceLevel {
            price,
            orders: IndexMap::new(),
        }
    }

    /// The price this level sits at.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Whether this level has no resting orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of resting orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Appends a new order to the tail of the level (spec §4.1
    /// `insert_order`). The caller is responsible for ensuring `id` is not
    /// already present in this book.
    pub fn insert_order(&mut self, id: String, size: Decimal, side: Side) {
        let order = Order::new(id.clone(), self.price, size, side);
        self.orders.insert(id, order);
    }

    /// `received` messages never change resting depth; this exists only so
    /// call sites can route the message through the level uniformly, per
    /// spec §4.1/§9.
    pub fn receive(&self, _id: &str, _size: Decimal) {}

    /// Subtracts `size` from `maker_id`'s remaining size. Does not remove
    /// the order even if its size reaches zero — the subsequent `done`
    /// message is authoritative for removal (spec §4.1).
    pub fn apply_match(&mut self, maker_id: &str, size: Decimal) -> Result<(), BookError> {
        let order = self
            .orders
            .get_mut(maker_id)
            .ok_or_else(|| BookError::OrderNotFound(maker_id.to_string()))?;
        order.size -= size;
        Ok(())
    }

    /// Replaces an order's size in place, preserving its time-priority
    /// position (spec §4.1 `change`).
    pub fn change(&mut self, id: &str, new_size: Decimal) -> Result<(), BookError> {
        let order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| BookError::OrderNotFound(id.to_string()))?;
        order.size = new_size;
        Ok(())
    }

    /// Removes an order from the level. Returns the removed order.
    pub fn remove_order(&mut self, id: &str) -> Result<Order, BookError> {
        self.orders
            .shift_remove(id)
            .ok_or_else(|| BookError::OrderNotFound(id.to_string()))
    }

    /// Iterates orders in time priority, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(cents: i64) -> Price {
        Price::from_cents(cents)
    }

    #[test]
    fn insert_preserves_time_priority() {
        let mut level = PriceLevel::new(px(10_000));
        level.insert_order("A".into(), Decimal::new(1, 0), Side::Bid);
        level.insert_order("B".into(), Decimal::new(2, 0), Side::Bid);
        level.insert_order("C".into(), Decimal::new(3, 0), Side::Bid);

        let ids: Vec<&str> = level.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn partial_match_then_change_preserves_priority() {
        // Scenario 3 from spec §8: level 100: [A(1), E(2)].
        let mut level = PriceLevel::new(px(10_000));
        level.insert_order("A".into(), Decimal::new(1, 0), Side::Bid);
        level.insert_order("E".into(), Decimal::new(2, 0), Side::Bid);

        level.apply_match("A", Decimal::new(4, 1)).unwrap(); // size 1 - 0.4
        level.change("A", Decimal::new(3, 1)).unwrap(); // new_size 0.3

        let ids: Vec<&str> = level.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "E"]);
        assert_eq!(level.orders["A"].size, Decimal::new(3, 1));
        assert_eq!(level.orders["E"].size, Decimal::new(2, 0));
    }

    #[test]
    fn match_on_absent_order_fails_loudly() {
        let mut level = PriceLevel::new(px(10_000));
        let err = level.apply_match("ghost", Decimal::new(1, 0));
        assert!(matches!(err, Err(BookError::OrderNotFound(_))));
    }

    #[test]
    fn remove_drops_order_and_is_idempotent_failure() {
        let mut level = PriceLevel::new(px(10_000));
        level.insert_order("A".into(), Decimal::new(1, 0), Side::Bid);
        level.remove_order("A").unwrap();
        assert!(level.is_empty());
        assert!(level.remove_order("A").is_err());
    }
}
